//! API Key 中间件
//!
//! 所有查询路由都要求 query 参数 `api-key` 与配置的密钥完全一致，
//! 不一致时直接返回 401 和固定提示，不会进入查询逻辑。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{trace, warn};

use crate::api::services::error_response;
use crate::services::{LookupQuery, LookupService};

#[derive(Clone)]
pub struct ApiKeyAuth {
    service: Arc<LookupService>,
}

impl ApiKeyAuth {
    pub fn new(service: Arc<LookupService>) -> Self {
        Self { service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            lookup: Arc::clone(&self.service),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    lookup: Arc<LookupService>,
}

impl<S> ApiKeyAuthMiddleware<S> {
    /// 从 query string 中取出第一个 `api-key`，其余参数不影响鉴权
    fn api_key(req: &ServiceRequest) -> Option<String> {
        LookupQuery::from_query_string(req.query_string()).api_key
    }
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let api_key = Self::api_key(&req);
        let authorized = self.lookup.authorize(api_key.as_deref());

        Box::pin(async move {
            if let Err(e) = authorized {
                warn!(
                    "Rejected request to {} from {:?}: {}",
                    req.path(),
                    req.peer_addr().map(|a| a.ip()),
                    e
                );
                let response: HttpResponse = error_response(&e);
                return Ok(req.into_response(response.map_into_right_body()));
            }

            trace!("API key accepted for {}", req.path());
            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}
