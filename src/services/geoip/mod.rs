//! GeoIP 服务模块
//!
//! 提供 IP 地址地理位置查询功能：
//! - MaxMind GeoLite2 / GeoIP2 City 本地数据库
//! - 内存实现（测试用）

mod maxmind;
mod memory;
mod provider;
mod record;

pub use maxmind::MaxMindProvider;
pub use memory::MemoryProvider;
pub use provider::{DatabaseStatus, GeoIpLookup, GeoIpProvider};
pub use record::{
    CityRecord, ContinentRecord, CountryRecord, LocalizedNames, LocationRecord, LookupRecord,
    PostalRecord, TraitsRecord, localized,
};
