//! HTTP API tests against a real MaxMind City database
//!
//! `tests/fixtures/city-test.mmdb` is a small GeoIP2-City style database
//! (IPv6 tree with IPv4 networks mapped in); `city-test-ipv4.mmdb` holds a
//! single IPv4 network in an IPv4-only tree. Both are regenerated by
//! `tests/fixtures/build_city_fixture.py`.

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::Value;
use std::sync::Arc;

use geolocator::api::middleware::{ApiKeyAuth, RequestLogger};
use geolocator::api::services::{AppStartTime, health_routes, lookup_routes};
use geolocator::config::GeoIpConfig;
use geolocator::services::{GeoIpProvider, LookupService};
use geolocator::utils::ClientIpPolicy;

const API_KEY: &str = "fixture-key";

const CITY_DB: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/city-test.mmdb");
const CITY_V4_DB: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/city-test-ipv4.mmdb"
);

/// Linköping, Sweden
const LINKOPING_IP: &str = "89.160.20.120";
/// Milton, WA, United States (has a metro code)
const MILTON_IP: &str = "216.160.83.60";
/// Located in China, registered to Germany
const CHANGCHUN_IP: &str = "175.16.199.5";
/// Japan, IPv6 network
const TOKYO_IP: &str = "2001:218::1";
/// Not in the database
const MISSING_IP: &str = "1.1.1.1";

macro_rules! maxmind_app {
    ($path:expr) => {{
        let provider = GeoIpProvider::new(&GeoIpConfig {
            database_path: $path.to_string(),
            ..Default::default()
        });
        let lookup = Arc::new(LookupService::new(API_KEY, "en", provider.clone()));
        test::init_service(
            App::new()
                .wrap(RequestLogger)
                .app_data(web::Data::from(lookup.clone()))
                .app_data(web::Data::new(ClientIpPolicy::default()))
                .app_data(web::Data::new(provider))
                .app_data(web::Data::new(AppStartTime::now()))
                .service(web::scope("/health").service(health_routes()))
                .service(
                    web::scope("/api")
                        .wrap(ApiKeyAuth::new(lookup))
                        .service(lookup_routes()),
                ),
        )
        .await
    }};
}

macro_rules! get_text {
    ($app:expr, $route:expr, $ip:expr $(, $extra:expr)?) => {{
        #[allow(unused_mut)]
        let mut uri = format!("{}?api-key={}&ip={}", $route, API_KEY, $ip);
        $(uri.push_str($extra);)?
        let resp = test::call_service($app, TestRequest::get().uri(&uri).to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }};
}

fn ok(text: &str) -> (StatusCode, String) {
    (StatusCode::OK, text.to_string())
}

#[actix_rt::test]
async fn test_country_name_by_language() {
    let app = maxmind_app!(CITY_DB);

    assert_eq!(get_text!(&app, "/api/country", LINKOPING_IP), ok("Sweden"));
    assert_eq!(
        get_text!(&app, "/api/country", LINKOPING_IP, "&lang=fr"),
        ok("Suède")
    );
    assert_eq!(
        get_text!(&app, "/api/country", LINKOPING_IP, "&lang=de"),
        ok("Schweden")
    );
    assert_eq!(
        get_text!(&app, "/api/country", MILTON_IP, "&lang=fr"),
        ok("États-Unis")
    );
    // 数据库里没有的语言
    assert_eq!(
        get_text!(&app, "/api/country", LINKOPING_IP, "&lang=ja"),
        ok("")
    );
}

#[actix_rt::test]
async fn test_text_fields_from_database() {
    let app = maxmind_app!(CITY_DB);

    let cases = [
        ("/api/city", LINKOPING_IP, "Linköping"),
        ("/api/postalCode", LINKOPING_IP, "582 28"),
        ("/api/timeZone", LINKOPING_IP, "Europe/Stockholm"),
        ("/api/countryCode", LINKOPING_IP, "SE"),
        ("/api/continentCode", LINKOPING_IP, "EU"),
        ("/api/continentName", LINKOPING_IP, "Europe"),
        ("/api/latitude", LINKOPING_IP, "58.4167"),
        ("/api/longitude", MILTON_IP, "-122.3149"),
        ("/api/city", CHANGCHUN_IP, "Changchun"),
        // 记录中没有 postal 和 city
        ("/api/postalCode", CHANGCHUN_IP, ""),
        ("/api/city", TOKYO_IP, ""),
    ];
    for (route, ip, expected) in cases {
        assert_eq!(get_text!(&app, route, ip), ok(expected), "{} {}", route, ip);
    }
}

#[actix_rt::test]
async fn test_in_european_union_uses_registered_country() {
    let app = maxmind_app!(CITY_DB);

    assert_eq!(
        get_text!(&app, "/api/inEuropeanUnion", LINKOPING_IP),
        ok("true")
    );
    // 位于中国、注册在德国
    assert_eq!(
        get_text!(&app, "/api/inEuropeanUnion", CHANGCHUN_IP),
        ok("true")
    );
    // 没有 EU 标记时为 false
    assert_eq!(
        get_text!(&app, "/api/inEuropeanUnion", MILTON_IP),
        ok("false")
    );

    let req = TestRequest::get()
        .uri(&format!("/api?api-key={}&ip={}", API_KEY, CHANGCHUN_IP))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["CountryISOCode"], "CN");
    assert_eq!(body["IsEU"], false);
    assert_eq!(body["IsAnonymousProxy"], true);
    assert_eq!(body["IsSatelliteProvider"], false);
}

#[actix_rt::test]
async fn test_aggregate_from_database() {
    let app = maxmind_app!(CITY_DB);

    let req = TestRequest::get()
        .uri(&format!("/api?api-key={}&ip={}", API_KEY, MILTON_IP))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body.as_object().unwrap().len(), 18);
    assert_eq!(body["IP"], MILTON_IP);
    assert_eq!(body["Country"], "United States");
    assert_eq!(body["CountryGeoNameID"], 6252001);
    assert_eq!(body["City"], "Milton");
    assert_eq!(body["CityGeoNameID"], 5803556);
    assert_eq!(body["ContinentCode"], "NA");
    assert_eq!(body["ZipCode"], "98354");
    assert_eq!(body["TimeZone"], "America/Los_Angeles");
    assert_eq!(body["IsEU"], false);

    // 整数字段必须输出为 JSON 整数
    assert!(body["MetroCode"].is_u64());
    assert_eq!(body["MetroCode"].as_u64(), Some(819));
    assert!(body["AccuracyRadius"].is_u64());
    assert_eq!(body["AccuracyRadius"].as_u64(), Some(22));
    assert!(body["Latitude"].is_f64());
    assert!((body["Latitude"].as_f64().unwrap() - 47.2513).abs() < 1e-9);
    assert!((body["Longitude"].as_f64().unwrap() + 122.3149).abs() < 1e-9);

    let req = TestRequest::get()
        .uri(&format!("/api?api-key={}&ip={}&lang=fr", API_KEY, LINKOPING_IP))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["Country"], "Suède");
    assert_eq!(body["IsEU"], true);
    assert_eq!(body["MetroCode"], 0);
    assert_eq!(body["AccuracyRadius"], 76);
}

#[actix_rt::test]
async fn test_ipv6_lookup() {
    let app = maxmind_app!(CITY_DB);

    assert_eq!(get_text!(&app, "/api/countryCode", TOKYO_IP), ok("JP"));
    assert_eq!(
        get_text!(&app, "/api/country", TOKYO_IP, "&lang=fr"),
        ok("Japon")
    );
    assert_eq!(
        get_text!(&app, "/api/timeZone", TOKYO_IP),
        ok("Asia/Tokyo")
    );
}

#[actix_rt::test]
async fn test_address_without_record_is_not_found() {
    let app = maxmind_app!(CITY_DB);

    for route in ["/api", "/api/city", "/api/inEuropeanUnion"] {
        let req = TestRequest::get()
            .uri(&format!("{}?api-key={}&ip={}", route, API_KEY, MISSING_IP))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "route {}", route);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 1004);
    }
}

#[actix_rt::test]
async fn test_ipv6_against_ipv4_database_is_not_found() {
    let app = maxmind_app!(CITY_V4_DB);

    assert_eq!(get_text!(&app, "/api/countryCode", "89.160.20.112"), ok("SE"));

    let req = TestRequest::get()
        .uri(&format!("/api/country?api-key={}&ip=2001:db8::1", API_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1004);
}

#[actix_rt::test]
async fn test_health_reports_database_metadata() {
    let app = maxmind_app!(CITY_DB);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["provider"], "MaxMind");
    assert_eq!(body["data"]["database"]["loaded"], true);
    assert_eq!(body["data"]["database"]["database_type"], "GeoIP2-City");
    assert_eq!(body["data"]["database"]["build_epoch"], 1_700_000_000u64);
}

#[actix_rt::test]
async fn test_missing_database_file_is_server_error() {
    let app = maxmind_app!("/nonexistent/city.mmdb");

    let req = TestRequest::get()
        .uri(&format!("/api/city?api-key={}&ip={}", API_KEY, LINKOPING_IP))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1030);
}
