//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::GeolocatorError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
}

impl From<&GeolocatorError> for ErrorCode {
    fn from(err: &GeolocatorError) -> Self {
        match err {
            GeolocatorError::InvalidApiKey => ErrorCode::AuthFailed,
            GeolocatorError::InvalidIp(_) | GeolocatorError::ClientAddressUnavailable(_) => {
                ErrorCode::BadRequest
            }
            GeolocatorError::AddressNotFound(_) => ErrorCode::NotFound,
            GeolocatorError::DatabaseUnavailable(_) => ErrorCode::ServiceUnavailable,
            GeolocatorError::Lookup(_)
            | GeolocatorError::Config(_)
            | GeolocatorError::FileOperation(_)
            | GeolocatorError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
