//! 内存 GeoIP 实现
//!
//! 以固定的 IP → 记录表代替 mmdb 文件，用于测试和基准测试。

use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;

use super::provider::{DatabaseStatus, GeoIpLookup};
use super::record::LookupRecord;
use crate::errors::{GeolocatorError, Result};

/// 内存 GeoIP Provider
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    records: HashMap<IpAddr, LookupRecord>,
    available: bool,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            available: true,
        }
    }

    /// 模拟无法打开的数据库
    pub fn unavailable() -> Self {
        Self {
            records: HashMap::new(),
            available: false,
        }
    }

    pub fn with_record(mut self, ip: IpAddr, record: LookupRecord) -> Self {
        self.records.insert(ip, record);
        self
    }
}

#[async_trait]
impl GeoIpLookup for MemoryProvider {
    async fn ensure_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(GeolocatorError::database_unavailable(
                "GeoIP database is unavailable",
            ))
        }
    }

    async fn lookup(&self, ip: IpAddr) -> Result<LookupRecord> {
        self.ensure_available().await?;
        self.records.get(&ip).cloned().ok_or_else(|| {
            GeolocatorError::address_not_found(format!("no record found for {}", ip))
        })
    }

    fn status(&self) -> DatabaseStatus {
        DatabaseStatus {
            loaded: self.available,
            path: ":memory:".to_string(),
            database_type: self.available.then(|| "Memory".to_string()),
            build_epoch: None,
        }
    }

    fn name(&self) -> &'static str {
        "Memory"
    }
}
