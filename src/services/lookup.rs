//! 查询服务
//!
//! 所有查询路由共用的校验与查询步骤：
//! 1. 校验 API Key
//! 2. 确认数据库可用
//! 3. 确定目标 IP（`ip` 参数，否则为调用方地址）
//! 4. 查询数据库
//! 5. 确定语言代码（`lang` 参数，否则为默认语言）

use std::net::{IpAddr, SocketAddr};

use actix_web::web;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use super::geoip::{GeoIpProvider, LookupRecord};
use crate::config::StaticConfig;
use crate::errors::{GeolocatorError, Result};

/// 查询参数
///
/// 同名参数重复出现时只取第一个值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupQuery {
    pub api_key: Option<String>,
    pub ip: Option<String>,
    pub lang: Option<String>,
}

impl LookupQuery {
    /// 从原始 query string 解析，未知参数忽略
    pub fn from_query_string(query_string: &str) -> Self {
        let pairs = match web::Query::<Vec<(String, String)>>::from_query(query_string) {
            Ok(pairs) => pairs.into_inner(),
            Err(e) => {
                // 不记录原始 query string（含 api-key）
                debug!("Unparseable query string: {}", e);
                return Self::default();
            }
        };

        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "api-key" => &mut query.api_key,
                "ip" => &mut query.ip,
                "lang" => &mut query.lang,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// 一次查询的结果
#[derive(Debug, Clone)]
pub struct Resolved {
    /// 实际查询的 IP（参数或调用方地址）
    pub ip: String,
    pub lang: String,
    pub record: LookupRecord,
}

pub struct LookupService {
    api_key: String,
    default_language: String,
    provider: GeoIpProvider,
}

impl LookupService {
    pub fn new(api_key: &str, default_language: &str, provider: GeoIpProvider) -> Self {
        Self {
            api_key: api_key.to_string(),
            default_language: default_language.to_string(),
            provider,
        }
    }

    pub fn from_config(config: &StaticConfig, provider: GeoIpProvider) -> Self {
        Self::new(
            &config.api.api_key,
            &config.geoip.default_language,
            provider,
        )
    }

    pub fn provider(&self) -> &GeoIpProvider {
        &self.provider
    }

    /// 校验 API Key（完全相等，常量时间比较）
    pub fn authorize(&self, api_key: Option<&str>) -> Result<()> {
        let given = api_key.unwrap_or_default();
        if !self.api_key.is_empty() && constant_time_compare(given, &self.api_key) {
            Ok(())
        } else {
            Err(GeolocatorError::InvalidApiKey)
        }
    }

    /// 确定语言代码
    pub fn language(&self, lang: Option<&str>) -> String {
        match lang.map(str::trim) {
            Some(lang) if !lang.is_empty() => lang.to_string(),
            _ => self.default_language.clone(),
        }
    }

    /// 执行查询（不含 API Key 校验）
    ///
    /// `client_ip` 为调用方地址，仅在 `ip` 参数为空时使用
    pub async fn resolve(&self, query: &LookupQuery, client_ip: Option<String>) -> Result<Resolved> {
        self.provider.ensure_available().await?;

        let (target, ip_addr) = match query.ip.as_deref().map(str::trim) {
            Some(ip) if !ip.is_empty() => (ip.to_string(), parse_ip(ip)?),
            _ => {
                let client_ip = client_ip.ok_or_else(|| {
                    GeolocatorError::client_address_unavailable(
                        "no ip parameter given and the client address is unknown",
                    )
                })?;
                let ip_addr = parse_client_ip(&client_ip)?;
                (ip_addr.to_string(), ip_addr)
            }
        };
        info!("REQUEST INCOME FROM - {}", target);

        let record = self.provider.lookup(ip_addr).await?;
        let lang = self.language(query.lang.as_deref());

        Ok(Resolved {
            ip: target,
            lang,
            record,
        })
    }
}

/// 解析调用方给出的 IP 地址，只接受裸地址（不带端口）
pub fn parse_ip(value: &str) -> Result<IpAddr> {
    value.parse::<IpAddr>().map_err(|_| {
        GeolocatorError::invalid_ip(format!("'{}' is not a valid IP address", value))
    })
}

/// 解析推断出的调用方地址，转发头里可能带端口
fn parse_client_ip(value: &str) -> Result<IpAddr> {
    parse_ip(value).or_else(|e| value.parse::<SocketAddr>().map(|a| a.ip()).map_err(|_| e))
}

/// 常量时间比较两个字符串
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
