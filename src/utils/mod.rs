pub mod ip;

pub use ip::{ClientIpPolicy, extract_client_ip};
