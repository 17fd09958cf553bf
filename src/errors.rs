use std::fmt;

/// 无效 API Key 时返回给调用方的固定提示
pub const INVALID_API_KEY_MESSAGE: &str = "Invalid API Key! Please contact an administrator.";

#[derive(Debug, Clone)]
pub enum GeolocatorError {
    InvalidApiKey,
    DatabaseUnavailable(String),
    InvalidIp(String),
    AddressNotFound(String),
    ClientAddressUnavailable(String),
    Lookup(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
}

impl GeolocatorError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeolocatorError::InvalidApiKey => "E001",
            GeolocatorError::DatabaseUnavailable(_) => "E002",
            GeolocatorError::InvalidIp(_) => "E003",
            GeolocatorError::AddressNotFound(_) => "E004",
            GeolocatorError::ClientAddressUnavailable(_) => "E005",
            GeolocatorError::Lookup(_) => "E006",
            GeolocatorError::Config(_) => "E007",
            GeolocatorError::FileOperation(_) => "E008",
            GeolocatorError::Serialization(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeolocatorError::InvalidApiKey => "Invalid API Key",
            GeolocatorError::DatabaseUnavailable(_) => "Database Unavailable",
            GeolocatorError::InvalidIp(_) => "Invalid IP Address",
            GeolocatorError::AddressNotFound(_) => "Address Not Found",
            GeolocatorError::ClientAddressUnavailable(_) => "Client Address Unavailable",
            GeolocatorError::Lookup(_) => "Lookup Error",
            GeolocatorError::Config(_) => "Configuration Error",
            GeolocatorError::FileOperation(_) => "File Operation Error",
            GeolocatorError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeolocatorError::InvalidApiKey => INVALID_API_KEY_MESSAGE,
            GeolocatorError::DatabaseUnavailable(msg) => msg,
            GeolocatorError::InvalidIp(msg) => msg,
            GeolocatorError::AddressNotFound(msg) => msg,
            GeolocatorError::ClientAddressUnavailable(msg) => msg,
            GeolocatorError::Lookup(msg) => msg,
            GeolocatorError::Config(msg) => msg,
            GeolocatorError::FileOperation(msg) => msg,
            GeolocatorError::Serialization(msg) => msg,
        }
    }

    /// 是否为调用方造成的错误（4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GeolocatorError::InvalidApiKey
                | GeolocatorError::InvalidIp(_)
                | GeolocatorError::AddressNotFound(_)
                | GeolocatorError::ClientAddressUnavailable(_)
        )
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            GeolocatorError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            GeolocatorError::InvalidIp(_) | GeolocatorError::ClientAddressUnavailable(_) => {
                StatusCode::BAD_REQUEST
            }
            GeolocatorError::AddressNotFound(_) => StatusCode::NOT_FOUND,
            GeolocatorError::DatabaseUnavailable(_)
            | GeolocatorError::Lookup(_)
            | GeolocatorError::Config(_)
            | GeolocatorError::FileOperation(_)
            | GeolocatorError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeolocatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeolocatorError {}

// 便捷的构造函数
impl GeolocatorError {
    pub fn database_unavailable<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::DatabaseUnavailable(msg.into())
    }

    pub fn invalid_ip<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::InvalidIp(msg.into())
    }

    pub fn address_not_found<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::AddressNotFound(msg.into())
    }

    pub fn client_address_unavailable<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::ClientAddressUnavailable(msg.into())
    }

    pub fn lookup<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::Lookup(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GeolocatorError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<maxminddb::MaxMindDbError> for GeolocatorError {
    fn from(err: maxminddb::MaxMindDbError) -> Self {
        match err {
            // 地址族与数据库不匹配（如 IPv4-only 库中查 IPv6），视为无记录
            maxminddb::MaxMindDbError::InvalidInput { message } => {
                GeolocatorError::address_not_found(message)
            }
            other => GeolocatorError::lookup(other.to_string()),
        }
    }
}

impl From<std::io::Error> for GeolocatorError {
    fn from(err: std::io::Error) -> Self {
        GeolocatorError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GeolocatorError {
    fn from(err: serde_json::Error) -> Self {
        GeolocatorError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for GeolocatorError {
    fn from(err: config::ConfigError) -> Self {
        GeolocatorError::config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeolocatorError>;
