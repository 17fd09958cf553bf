//! GeoIP Provider 抽象层
//!
//! 统一的 GeoIP 查询接口：
//! - 生产环境使用 MaxMindProvider（本地 mmdb 文件）
//! - 测试使用 MemoryProvider（内存表）

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::maxmind::MaxMindProvider;
use super::record::LookupRecord;
use crate::config::GeoIpConfig;
use crate::errors::Result;

/// 数据库状态（用于健康检查）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatabaseStatus {
    pub loaded: bool,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_epoch: Option<u64>,
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    /// 确认数据库可用，不可用时返回 `DatabaseUnavailable`
    async fn ensure_available(&self) -> Result<()>;

    /// 查询 IP 地址的完整记录
    ///
    /// 没有记录时返回 `AddressNotFound`
    async fn lookup(&self, ip: IpAddr) -> Result<LookupRecord>;

    /// 当前数据库状态
    fn status(&self) -> DatabaseStatus;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 统一 GeoIP Provider
///
/// 启动时创建一次，所有 worker 共享同一个只读句柄
pub struct GeoIpProvider {
    inner: Arc<dyn GeoIpLookup>,
}

impl GeoIpProvider {
    /// 根据 GeoIpConfig 初始化 MaxMind 数据库
    ///
    /// 打开失败不会中断启动，之后的请求会重试打开
    pub fn new(config: &GeoIpConfig) -> Self {
        let provider = MaxMindProvider::new(&config.database_path);
        let inner: Arc<dyn GeoIpLookup> = Arc::new(provider);
        info!("GeoIP: Initialized with {} provider", inner.name());
        Self { inner }
    }

    /// 使用任意实现创建 Provider
    pub fn from_lookup(inner: Arc<dyn GeoIpLookup>) -> Self {
        Self { inner }
    }

    pub async fn ensure_available(&self) -> Result<()> {
        self.inner.ensure_available().await
    }

    pub async fn lookup(&self, ip: IpAddr) -> Result<LookupRecord> {
        self.inner.lookup(ip).await
    }

    pub fn status(&self) -> DatabaseStatus {
        self.inner.status()
    }

    /// 获取当前使用的 provider 名称
    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl Clone for GeoIpProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
