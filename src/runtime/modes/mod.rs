//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - CLI mode (offline lookup, sample config)

pub mod cli;
pub mod server;

pub use cli::{generate_config, run_lookup};
pub use server::run_server;
