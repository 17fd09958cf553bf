//! MaxMind GeoLite2 / GeoIP2 数据库实现
//!
//! 使用本地 City 格式 mmdb 文件进行 IP 地理位置查询。
//! 数据库在启动时打开一次并在所有请求间共享；
//! 启动时打开失败则在后续请求中重试，而不是让进程退出。

use std::net::IpAddr;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use maxminddb::Reader;
use tracing::{error, info, trace, warn};

use super::provider::{DatabaseStatus, GeoIpLookup};
use super::record::LookupRecord;
use crate::errors::{GeolocatorError, Result};

/// MaxMind GeoIP Provider
pub struct MaxMindProvider {
    path: String,
    reader: ArcSwapOption<Reader<Vec<u8>>>,
}

impl MaxMindProvider {
    /// 创建 Provider 并尝试打开数据库
    ///
    /// 打开失败只记录日志，请求时会再次尝试
    pub fn new(path: &str) -> Self {
        let reader = match Reader::open_readfile(path) {
            Ok(reader) => {
                info!(
                    "GeoIP: Using MaxMind database at {} ({}, build {})",
                    path, reader.metadata.database_type, reader.metadata.build_epoch
                );
                Some(Arc::new(reader))
            }
            Err(e) => {
                error!("GeoIP: Failed to open MaxMind database at {}: {}", path, e);
                None
            }
        };

        Self {
            path: path.to_string(),
            reader: ArcSwapOption::new(reader),
        }
    }

    /// 打开数据库，失败直接返回错误（用于 CLI 单次查询）
    pub fn open(path: &str) -> Result<Self> {
        let reader = Reader::open_readfile(path).map_err(|e| {
            GeolocatorError::database_unavailable(format!(
                "failed to open GeoIP database at {}: {}",
                path, e
            ))
        })?;

        Ok(Self {
            path: path.to_string(),
            reader: ArcSwapOption::new(Some(Arc::new(reader))),
        })
    }

    /// 获取共享的 Reader，尚未打开时在阻塞线程池中重新打开
    async fn reader(&self) -> Result<Arc<Reader<Vec<u8>>>> {
        if let Some(reader) = self.reader.load_full() {
            return Ok(reader);
        }

        let path = self.path.clone();
        let opened = tokio::task::spawn_blocking(move || Reader::open_readfile(&path))
            .await
            .map_err(|e| {
                GeolocatorError::database_unavailable(format!("database open task failed: {}", e))
            })?;

        match opened {
            Ok(reader) => {
                let reader = Arc::new(reader);
                self.reader.store(Some(Arc::clone(&reader)));
                info!("GeoIP: MaxMind database at {} is now available", self.path);
                Ok(reader)
            }
            Err(e) => {
                warn!("GeoIP: MaxMind database at {} still unavailable: {}", self.path, e);
                Err(GeolocatorError::database_unavailable(
                    "GeoIP database is unavailable",
                ))
            }
        }
    }
}

#[async_trait]
impl GeoIpLookup for MaxMindProvider {
    async fn ensure_available(&self) -> Result<()> {
        self.reader().await.map(|_| ())
    }

    async fn lookup(&self, ip: IpAddr) -> Result<LookupRecord> {
        let reader = self.reader().await?;

        let result = reader.lookup(ip)?;
        if !result.has_data() {
            return Err(GeolocatorError::address_not_found(format!(
                "no record found for {}",
                ip
            )));
        }

        let record: LookupRecord = result.decode()?.ok_or_else(|| {
            GeolocatorError::address_not_found(format!("no record found for {}", ip))
        })?;

        trace!(
            "MaxMind lookup for {}: country={:?}, city={:?}",
            ip,
            record.country.iso_code,
            record.city.names.get("en")
        );

        Ok(record)
    }

    fn status(&self) -> DatabaseStatus {
        match self.reader.load_full() {
            Some(reader) => DatabaseStatus {
                loaded: true,
                path: self.path.clone(),
                database_type: Some(reader.metadata.database_type.clone()),
                build_epoch: Some(reader.metadata.build_epoch),
            },
            None => DatabaseStatus {
                loaded: false,
                path: self.path.clone(),
                ..Default::default()
            },
        }
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
