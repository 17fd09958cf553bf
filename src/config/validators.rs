//! 配置值验证模块
//!
//! 启动服务器前检查静态配置，避免以危险或无效的配置运行。

use super::StaticConfig;

/// 验证服务器模式所需的配置
///
/// - api.api_key 不能为空（空密钥会让缺少 `api-key` 参数的请求通过）
/// - api.prefix 必须以 `/` 开头，且不能以 `/` 结尾（根路径 `/` 除外）
/// - geoip.default_language 不能为空
/// - logging.format 只能是 text 或 json
pub fn validate_server_config(config: &StaticConfig) -> Result<(), String> {
    if config.api.api_key.trim().is_empty() {
        return Err("api.api_key must be set (GL__API__API_KEY)".to_string());
    }

    validate_prefix(&config.api.prefix)?;

    if config.geoip.default_language.trim().is_empty() {
        return Err("geoip.default_language must not be empty".to_string());
    }

    match config.logging.format.as_str() {
        "text" | "json" => {}
        other => {
            return Err(format!(
                "Invalid logging.format: '{}'. Valid: text, json",
                other
            ));
        }
    }

    Ok(())
}

/// 验证路由前缀
pub fn validate_prefix(prefix: &str) -> Result<(), String> {
    if !prefix.starts_with('/') {
        return Err(format!("api.prefix must start with '/': '{}'", prefix));
    }
    if prefix.len() > 1 && prefix.ends_with('/') {
        return Err(format!("api.prefix must not end with '/': '{}'", prefix));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> StaticConfig {
        let mut config = StaticConfig::default();
        config.api.api_key = "secret".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_server_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut config = valid_config();
        config.api.api_key = "  ".to_string();
        let err = validate_server_config(&config).unwrap_err();
        assert!(err.contains("api_key"));
    }

    #[test]
    fn test_prefix_rules() {
        assert!(validate_prefix("/api").is_ok());
        assert!(validate_prefix("/").is_ok());
        assert!(validate_prefix("/v1/geo").is_ok());
        assert!(validate_prefix("api").is_err());
        assert!(validate_prefix("/api/").is_err());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = valid_config();
        config.logging.format = "xml".to_string();
        assert!(validate_server_config(&config).is_err());
    }
}
