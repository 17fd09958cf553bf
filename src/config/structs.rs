use serde::{Deserialize, Serialize};

use crate::errors::{GeolocatorError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用，运行期间不会重新加载）
///
/// - server: 监听地址、端口、CPU 数量
/// - api: API Key、路由前缀、可信代理
/// - geoip: 数据库路径、默认语言
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：GL，分隔符：__
    /// 示例：GL__SERVER__PORT=9000
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 GL，分隔符 __
            .add_source(
                Environment::with_prefix("GL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api.trusted_proxies")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GeolocatorError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default)]
    pub unix_socket: Option<String>,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 所有查询路由共用的静态密钥（query 参数 `api-key`）
    #[serde(default)]
    pub api_key: String,
    /// 查询路由前缀
    #[serde(default = "default_api_prefix")]
    pub prefix: String,
    /// 可信代理列表（单 IP 或 CIDR）
    ///
    /// 为空时，来自私有地址/localhost 的连接视为反向代理
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

/// GeoIP 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// MaxMind 格式数据库文件路径（GeoLite2-City / GeoIP2-City）
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// 未指定 `lang` 参数时使用的语言代码
    #[serde(default = "default_language")]
    pub default_language: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    9000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_database_path() -> String {
    "geodb.mmdb".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            unix_socket: None,
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            prefix: default_api_prefix(),
            trusted_proxies: Vec::new(),
        }
    }
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            default_language: default_language(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
