//! CLI mode
//!
//! Offline commands that do not start the HTTP server.

use colored::Colorize;

use crate::config::StaticConfig;
use crate::errors::{GeolocatorError, Result};
use crate::services::geoip::MaxMindProvider;
use crate::services::{AggregateResult, GeoIpProvider, LookupService, parse_ip};
use std::sync::Arc;

/// 默认示例配置输出路径
pub const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

/// 查询单个 IP 并返回格式化后的 JSON
///
/// 与服务器不同，数据库打不开时直接报错
pub async fn lookup_json(config: &StaticConfig, ip: &str, lang: Option<&str>) -> Result<String> {
    let reader = MaxMindProvider::open(&config.geoip.database_path)?;
    let provider = GeoIpProvider::from_lookup(Arc::new(reader));
    let service = LookupService::from_config(config, provider);

    let ip_addr = parse_ip(ip.trim())?;
    let record = service.provider().lookup(ip_addr).await?;
    let lang = service.language(lang);

    let result = AggregateResult::from_record(ip.trim(), &record, &lang);
    Ok(serde_json::to_string_pretty(&result)?)
}

/// `geolocator lookup <ip>`
pub async fn run_lookup(config: &StaticConfig, ip: &str, lang: Option<&str>) -> Result<()> {
    let json = lookup_json(config, ip, lang).await?;
    println!("{}", json);
    Ok(())
}

/// `geolocator config generate [PATH]`
pub fn generate_config(output_path: Option<&str>) -> Result<()> {
    let path = output_path.unwrap_or(DEFAULT_SAMPLE_PATH);
    if std::path::Path::new(path).exists() {
        return Err(GeolocatorError::file_operation(format!(
            "{} already exists, refusing to overwrite",
            path
        )));
    }

    StaticConfig::default().save_to_file(path)?;
    println!(
        "{} Sample configuration written to {}",
        "✓".green().bold(),
        path.cyan()
    );
    Ok(())
}
