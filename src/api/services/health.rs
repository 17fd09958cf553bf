use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, trace, warn};

use super::error_code::ErrorCode;
use super::helpers::json_response;
use crate::services::{DatabaseStatus, GeoIpProvider};

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub provider: String,
    pub database: DatabaseStatus,
    pub response_time_ms: u32,
}

/// Health Service
///
/// 不需要 API Key，供负载均衡和 k8s 健康检查使用
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        provider: web::Data<GeoIpProvider>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let database = provider.status();
        let is_healthy = database.loaded;

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let health_data = HealthResponse {
            status: if is_healthy {
                "healthy".to_string()
            } else {
                "unhealthy".to_string()
            },
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds,
            provider: provider.provider_name().to_string(),
            database,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}s",
            start_time.elapsed(),
            health_data.status,
            uptime_seconds
        );

        if is_healthy {
            json_response(
                actix_web::http::StatusCode::OK,
                ErrorCode::Success,
                "OK",
                Some(health_data),
            )
        } else {
            json_response(
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                Some(health_data),
            )
        }
    }

    // 就绪检查：数据库可用时返回 200，否则 503（会触发一次重新打开）
    pub async fn readiness_check(provider: web::Data<GeoIpProvider>) -> impl Responder {
        trace!("Received readiness check request");

        match provider.ensure_available().await {
            Ok(()) => HttpResponse::Ok()
                .append_header(("Content-Type", "text/plain"))
                .body("OK"),
            Err(e) => {
                warn!("Readiness check failed: {}", e);
                HttpResponse::ServiceUnavailable()
                    .append_header(("Content-Type", "text/plain"))
                    .body("Database Unavailable")
            }
        }
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
