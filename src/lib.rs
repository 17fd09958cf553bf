//! geolocator - IP geolocation over HTTP
//!
//! Resolves an IP address (or the caller's own address) against a local
//! MaxMind `.mmdb` database and returns geographic attributes as plain text
//! or JSON.
//!
//! # Architecture
//! - `api`: HTTP handlers and middleware (API key guard, request logging)
//! - `services`: lookup step, database providers, field formatting
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: server and CLI execution modes
//! - `system`: logging and panic hook
//! - `utils`: client IP extraction

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
