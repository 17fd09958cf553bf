//! GeoIP 查询结果
//!
//! 直接从 MaxMind City 数据库反序列化的记录结构。
//! 所有字段都可能缺失，缺失时按零值处理（空字符串、0、false）。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 多语言名称，key 为语言代码（如 "en"、"de"、"pt-BR"、"zh-CN"）
pub type LocalizedNames = BTreeMap<String, String>;

/// 按语言代码取名称，不存在时返回空字符串
pub fn localized<'a>(names: &'a LocalizedNames, lang: &str) -> &'a str {
    names.get(lang).map(String::as_str).unwrap_or_default()
}

/// 单个 IP 的完整查询记录（每次请求独立解码，只读）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupRecord {
    #[serde(default)]
    pub city: CityRecord,
    #[serde(default)]
    pub continent: ContinentRecord,
    /// MaxMind 判断 IP 所在的国家
    #[serde(default)]
    pub country: CountryRecord,
    /// ISP 注册该 IP 段的国家，可能与 `country` 不同
    #[serde(default)]
    pub registered_country: CountryRecord,
    #[serde(default)]
    pub location: LocationRecord,
    #[serde(default)]
    pub postal: PostalRecord,
    #[serde(default)]
    pub traits: TraitsRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    #[serde(default)]
    pub geoname_id: Option<u32>,
    #[serde(default)]
    pub names: LocalizedNames,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContinentRecord {
    /// 两字母大洲代码（如 "EU"、"NA"）
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub geoname_id: Option<u32>,
    #[serde(default)]
    pub names: LocalizedNames,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(default)]
    pub geoname_id: Option<u32>,
    #[serde(default)]
    pub is_in_european_union: Option<bool>,
    /// ISO 3166-1 alpha-2 国家代码
    #[serde(default)]
    pub iso_code: Option<String>,
    #[serde(default)]
    pub names: LocalizedNames,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// 精度半径（公里）
    #[serde(default)]
    pub accuracy_radius: Option<u16>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub metro_code: Option<u32>,
    /// IANA 时区（如 "Europe/Berlin"）
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostalRecord {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitsRecord {
    #[serde(default)]
    pub is_anonymous_proxy: Option<bool>,
    #[serde(default)]
    pub is_satellite_provider: Option<bool>,
}
