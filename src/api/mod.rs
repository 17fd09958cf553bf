//! HTTP layer: middleware, handlers and route tables.

pub mod middleware;
pub mod services;

/// Health 路由前缀（不受 API Key 保护）
pub const HEALTH_PREFIX: &str = "/health";
