//! 工具函数性能基准测试

use actix_web::test::TestRequest;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use geolocator::services::parse_ip;
use geolocator::utils::ip::{ip_in_cidr, is_trusted_proxy, resolve_client_ip};
use geolocator::utils::{ClientIpPolicy, extract_client_ip};

// ============== IP 解析 ==============

fn bench_parse_ip(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/parse_ip");

    group.bench_function("ipv4", |b| {
        b.iter(|| parse_ip(black_box("81.2.69.142")));
    });

    group.bench_function("ipv6", |b| {
        b.iter(|| parse_ip(black_box("2001:db8:85a3::8a2e:370:7334")));
    });

    group.bench_function("with_port_rejected", |b| {
        b.iter(|| parse_ip(black_box("81.2.69.142:443")));
    });

    group.bench_function("invalid", |b| {
        b.iter(|| parse_ip(black_box("not-an-ip")));
    });

    group.finish();
}

// ============== 可信代理匹配 ==============

fn bench_trusted_proxy(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/trusted_proxy");
    let proxies = vec![
        "10.0.0.0/8".to_string(),
        "172.16.0.0/12".to_string(),
        "2001:db8::/32".to_string(),
        "192.168.1.1".to_string(),
    ];

    group.bench_function("cidr_hit", |b| {
        let ip = "172.20.1.1".parse().unwrap();
        b.iter(|| ip_in_cidr(black_box(&ip), black_box("172.16.0.0/12")));
    });

    group.bench_function("list_miss", |b| {
        b.iter(|| is_trusted_proxy(black_box("8.8.8.8"), black_box(&proxies)));
    });

    group.finish();
}

// ============== 客户端 IP 提取 ==============

fn bench_client_ip(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/client_ip");
    let policy = ClientIpPolicy::default();

    group.bench_function("resolve_direct", |b| {
        b.iter(|| resolve_client_ip(black_box(Some("8.8.8.8")), &policy, || None));
    });

    group.bench_function("resolve_forwarded", |b| {
        b.iter(|| {
            resolve_client_ip(black_box(Some("10.0.0.1")), &policy, || {
                Some("1.1.1.1".to_string())
            })
        });
    });

    group.bench_function("extract_from_request", |b| {
        let req = TestRequest::default()
            .peer_addr("127.0.0.1:8080".parse().unwrap())
            .insert_header(("X-Forwarded-For", "1.1.1.1, 10.0.0.1"))
            .to_http_request();
        b.iter(|| extract_client_ip(black_box(&req), &policy));
    });

    group.finish();
}

criterion_group!(benches, bench_parse_ip, bench_trusted_proxy, bench_client_ip);
criterion_main!(benches);
