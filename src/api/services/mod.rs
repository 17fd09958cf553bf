pub mod error_code;
pub mod health;
pub mod helpers;
pub mod lookup;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{ApiResponse, error_response, json_response, text_response};
pub use lookup::{LookupApi, lookup_routes, scope_path};
