//! 单字段格式化
//!
//! 每个纯文本路由只输出记录中的一个字段，不带 JSON 包装。

use strum::{AsRefStr, EnumIter, EnumString};

use super::geoip::{LookupRecord, localized};

/// 纯文本路由对应的字段，序列化名即路由后缀
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum GeoField {
    City,
    Country,
    PostalCode,
    InEuropeanUnion,
    Longitude,
    Latitude,
    TimeZone,
    CountryCode,
    ContinentCode,
    ContinentName,
}

impl GeoField {
    /// 路由路径（相对 API 前缀），例如 `/postalCode`
    pub fn path(&self) -> String {
        format!("/{}", self.as_ref())
    }

    /// 按字段规则格式化为纯文本
    ///
    /// `inEuropeanUnion` 取的是注册国家（registered_country）的标记
    pub fn format(&self, record: &LookupRecord, lang: &str) -> String {
        match self {
            GeoField::City => localized(&record.city.names, lang).to_string(),
            GeoField::Country => localized(&record.country.names, lang).to_string(),
            GeoField::ContinentName => localized(&record.continent.names, lang).to_string(),
            GeoField::PostalCode => record.postal.code.clone().unwrap_or_default(),
            GeoField::InEuropeanUnion => record
                .registered_country
                .is_in_european_union
                .unwrap_or(false)
                .to_string(),
            GeoField::Longitude => format_coordinate(record.location.longitude.unwrap_or(0.0)),
            GeoField::Latitude => format_coordinate(record.location.latitude.unwrap_or(0.0)),
            GeoField::TimeZone => record.location.time_zone.clone().unwrap_or_default(),
            GeoField::CountryCode => record.country.iso_code.clone().unwrap_or_default(),
            GeoField::ContinentCode => record.continent.code.clone().unwrap_or_default(),
        }
    }
}

/// 坐标格式化：最短且可无损还原的十进制表示（无指数、无多余的 0）
#[inline]
pub fn format_coordinate(value: f64) -> String {
    value.to_string()
}
