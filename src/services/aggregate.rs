use serde::{Deserialize, Serialize};

use super::geoip::{LookupRecord, localized};

/// 聚合路由返回的扁平结构
///
/// 字段名与对外 JSON 保持一致；`IsEU` 取的是 IP 所在国家（country）的标记
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AggregateResult {
    #[serde(rename = "IP")]
    pub ip: String,
    pub country: String,
    #[serde(rename = "CountryGeoNameID")]
    pub country_geo_name_id: u32,
    #[serde(rename = "CountryISOCode")]
    pub country_iso_code: String,
    pub city: String,
    #[serde(rename = "CityGeoNameID")]
    pub city_geo_name_id: u32,
    #[serde(rename = "IsEU")]
    pub is_eu: bool,
    pub time_zone: String,
    pub continent: String,
    pub continent_code: String,
    #[serde(rename = "ContinentGeoNameID")]
    pub continent_geo_name_id: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub zip_code: String,
    pub accuracy_radius: u16,
    pub metro_code: u32,
    pub is_anonymous_proxy: bool,
    pub is_satellite_provider: bool,
}

impl AggregateResult {
    pub fn from_record(ip: &str, record: &LookupRecord, lang: &str) -> Self {
        let country = &record.country;
        let city = &record.city;
        let continent = &record.continent;
        let location = &record.location;
        let traits = &record.traits;

        Self {
            ip: ip.to_string(),
            country: localized(&country.names, lang).to_string(),
            country_geo_name_id: country.geoname_id.unwrap_or_default(),
            country_iso_code: country.iso_code.clone().unwrap_or_default(),
            city: localized(&city.names, lang).to_string(),
            city_geo_name_id: city.geoname_id.unwrap_or_default(),
            is_eu: country.is_in_european_union.unwrap_or(false),
            time_zone: location.time_zone.clone().unwrap_or_default(),
            continent: localized(&continent.names, lang).to_string(),
            continent_code: continent.code.clone().unwrap_or_default(),
            continent_geo_name_id: continent.geoname_id.unwrap_or_default(),
            latitude: location.latitude.unwrap_or_default(),
            longitude: location.longitude.unwrap_or_default(),
            zip_code: record.postal.code.clone().unwrap_or_default(),
            accuracy_radius: location.accuracy_radius.unwrap_or_default(),
            metro_code: location.metro_code.unwrap_or_default(),
            is_anonymous_proxy: traits.is_anonymous_proxy.unwrap_or(false),
            is_satellite_provider: traits.is_satellite_provider.unwrap_or(false),
        }
    }
}
