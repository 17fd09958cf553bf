//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::GeolocatorError;

use super::error_code::ErrorCode;

/// 统一 JSON 响应结构
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 从 GeolocatorError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_response(err: &GeolocatorError) -> HttpResponse {
    json_response::<()>(err.http_status(), ErrorCode::from(err), err.message(), None)
}

/// 纯文本响应（单字段路由）
pub fn text_response(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/plain; charset=utf-8"))
        .body(body)
}
