use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::services::scope_path;
use crate::config::{StaticConfig, validate_server_config};
use crate::services::{GeoIpProvider, LookupService};
use crate::utils::ClientIpPolicy;

/// 服务器启动所需的共享状态
pub struct StartupContext {
    pub provider: GeoIpProvider,
    pub lookup: Arc<LookupService>,
    pub client_ip_policy: ClientIpPolicy,
    pub route_config: RouteConfig,
}

#[derive(Clone, Debug)]
pub struct RouteConfig {
    /// actix scope 路径（`/` 前缀对应空字符串）
    pub api_scope: String,
    pub health_prefix: String,
}

/// 准备服务器启动的上下文
///
/// 数据库打不开不会导致启动失败，只会让查询返回 500 直到文件可用
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    validate_server_config(config)
        .map_err(|e| anyhow!(e))
        .context("Invalid configuration")?;

    let provider = GeoIpProvider::new(&config.geoip);
    let status = provider.status();
    if status.loaded {
        info!(
            "GeoIP database loaded: {} ({})",
            status.path,
            status.database_type.as_deref().unwrap_or("unknown type")
        );
    } else {
        warn!(
            "GeoIP database {} is not available yet; lookups will fail until it can be opened",
            status.path
        );
    }

    let lookup = Arc::new(LookupService::from_config(config, provider.clone()));

    let client_ip_policy = ClientIpPolicy::from_config(config);
    if client_ip_policy.trusted_proxies.is_empty() {
        warn!(
            "Client IP detection: auto-detect mode. \
             Connections from private IPs will use X-Forwarded-For. \
             To disable, configure api.trusted_proxies explicitly."
        );
    } else {
        info!(
            "Client IP detection: trusted proxies {:?}",
            client_ip_policy.trusted_proxies
        );
    }

    let route_config = RouteConfig {
        api_scope: scope_path(&config.api.prefix).to_string(),
        health_prefix: crate::api::HEALTH_PREFIX.to_string(),
    };

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        provider,
        lookup,
        client_ip_policy,
        route_config,
    })
}
