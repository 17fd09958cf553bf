pub mod api_key;
pub mod request_log;

pub use api_key::ApiKeyAuth;
pub use request_log::{REQUEST_ID_HEADER, RequestLogger};
