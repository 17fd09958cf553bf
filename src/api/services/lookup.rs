use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use futures_util::future::{Ready, ready};
use strum::IntoEnumIterator;
use tracing::{error, warn};

use super::helpers::{error_response, text_response};
use crate::errors::{GeolocatorError, Result};
use crate::services::{AggregateResult, GeoField, LookupQuery, LookupService, Resolved};
use crate::utils::{ClientIpPolicy, extract_client_ip};

/// 从 query string 提取查询参数，重复参数取第一个
impl FromRequest for LookupQuery {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(LookupQuery::from_query_string(req.query_string())))
    }
}

pub struct LookupApi;

impl LookupApi {
    /// 聚合路由：返回所有字段的 JSON
    pub async fn all(
        req: HttpRequest,
        query: LookupQuery,
        service: web::Data<LookupService>,
        policy: web::Data<ClientIpPolicy>,
    ) -> HttpResponse {
        match Self::resolve(&req, &query, &service, &policy).await {
            Ok(resolved) => HttpResponse::Ok()
                .insert_header(("Content-Type", "application/json"))
                .json(AggregateResult::from_record(
                    &resolved.ip,
                    &resolved.record,
                    &resolved.lang,
                )),
            Err(e) => Self::failure(&req, e),
        }
    }

    /// 单字段路由：只输出一个字段的纯文本
    pub async fn field(
        field: GeoField,
        req: HttpRequest,
        query: LookupQuery,
        service: web::Data<LookupService>,
        policy: web::Data<ClientIpPolicy>,
    ) -> HttpResponse {
        match Self::resolve(&req, &query, &service, &policy).await {
            Ok(resolved) => text_response(field.format(&resolved.record, &resolved.lang)),
            Err(e) => Self::failure(&req, e),
        }
    }

    async fn resolve(
        req: &HttpRequest,
        query: &LookupQuery,
        service: &LookupService,
        policy: &ClientIpPolicy,
    ) -> Result<Resolved> {
        // 显式传入 ip 时不需要推断调用方地址
        let client_ip = match query.ip.as_deref().map(str::trim) {
            Some(ip) if !ip.is_empty() => None,
            _ => extract_client_ip(req, policy),
        };
        service.resolve(query, client_ip).await
    }

    fn failure(req: &HttpRequest, err: GeolocatorError) -> HttpResponse {
        if err.is_client_error() {
            warn!("Lookup for {} rejected: {}", req.path(), err);
        } else {
            error!("Lookup for {} failed: {}", req.path(), err);
        }
        error_response(&err)
    }
}

/// 查询路由配置（挂在 API 前缀下）
pub fn lookup_routes() -> actix_web::Scope {
    let mut scope = web::scope("")
        .route("", web::get().to(LookupApi::all))
        .route("", web::head().to(LookupApi::all));

    for field in GeoField::iter() {
        let path = field.path();
        let handler = move |req: HttpRequest,
                            query: LookupQuery,
                            service: web::Data<LookupService>,
                            policy: web::Data<ClientIpPolicy>| {
            LookupApi::field(field, req, query, service, policy)
        };
        scope = scope
            .route(&path, web::get().to(handler))
            .route(&path, web::head().to(handler));
    }

    scope
}

/// 将配置中的前缀转换为 scope 路径（根前缀 `/` 对应空 scope）
pub fn scope_path(prefix: &str) -> &str {
    if prefix == "/" { "" } else { prefix }
}
