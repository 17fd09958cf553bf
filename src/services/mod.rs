//! Service layer for business logic
//!
//! This module provides the lookup logic shared between the HTTP API and
//! the command line.

mod aggregate;
mod fields;
pub mod geoip;
mod lookup;

pub use aggregate::AggregateResult;
pub use fields::{GeoField, format_coordinate};
pub use geoip::{DatabaseStatus, GeoIpLookup, GeoIpProvider, LookupRecord};
pub use lookup::{LookupQuery, LookupService, Resolved, parse_ip};
