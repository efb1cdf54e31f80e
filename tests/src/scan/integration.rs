use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sonar_common::config::ScanConfig;
use sonar_common::error::TargetError;
use sonar_common::network::port::Banner;
use sonar_common::network::range::PortRange;
use sonar_common::network::target::{ResolvedTarget, Target};
use sonar_core::network::tcp::TcpConnector;
use sonar_core::profile::ProfileService;
use sonar_core::scanner::PortScanner;
use sonar_core::scanner::prober::ServiceProber;

use crate::utils::{FixedSystem, LOCALHOST, banner_server, closed_port, silent_server};

fn service() -> ProfileService<TcpConnector> {
    ProfileService::new(Box::new(FixedSystem), Arc::new(TcpConnector))
}

fn around(port: u16, spread: u16) -> PortRange {
    PortRange::new(port.saturating_sub(spread).max(1), port.saturating_add(spread)).unwrap()
}

#[tokio::test]
async fn profile_reports_banner_of_single_open_port() {
    let server = banner_server(b"HELLO\n").await;
    let closed = closed_port().await;
    let range = PortRange::new(server.port.min(closed), server.port.max(closed)).unwrap();

    let cfg = ScanConfig::new(ResolvedTarget::from(LOCALHOST), range)
        .with_concurrency(NonZeroUsize::new(16).unwrap());
    let profile = service().profile(&cfg, None).await.unwrap();

    assert!(profile.scan.open_ports.contains(&server.port));
    assert!(!profile.scan.open_ports.contains(&closed));
    assert_eq!(
        profile.services.get(server.port),
        Some(&Banner::Text("HELLO".into()))
    );
    assert_eq!(profile.services.ports(), profile.scan.open_ports);
}

#[tokio::test]
async fn silent_service_has_no_banner_after_probe_timeout() {
    let server = silent_server().await;
    let limit = Duration::from_millis(250);
    let prober = ServiceProber::new(Arc::new(TcpConnector), limit);

    let started = Instant::now();
    let services = prober.probe(LOCALHOST, &[server.port]).await;

    assert_eq!(services.get(server.port), Some(&Banner::None));
    assert!(started.elapsed() >= limit);
    assert!(started.elapsed() < limit * 8);
}

#[test]
fn inverted_range_is_rejected_up_front() {
    assert_eq!(
        PortRange::new(1, 0),
        Err(TargetError::InvertedRange { start: 1, end: 0 })
    );
    assert!("1-0".parse::<PortRange>().is_err());
}

#[tokio::test]
async fn open_ports_are_ascending_at_any_concurrency() {
    let servers = [
        banner_server(b"a\n").await,
        banner_server(b"b\n").await,
        banner_server(b"c\n").await,
    ];
    let range = around(servers[1].port, 40);

    let mut seen = Vec::new();
    for workers in [1, 4, 64] {
        let scanner = PortScanner::new(Arc::new(TcpConnector), Duration::from_millis(500))
            .with_concurrency(NonZeroUsize::new(workers).unwrap());
        let result = scanner.scan(LOCALHOST, range).await;

        assert!(result.open_ports.windows(2).all(|w| w[0] < w[1]));
        assert!(result.open_ports.contains(&servers[1].port));
        assert_eq!(result.attempted, range.len());
        assert!(!result.interrupted);
        seen.push(result.open_ports);
    }

    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[1], seen[2]);
}

#[tokio::test]
async fn rescanning_a_stable_host_is_idempotent() {
    let server = banner_server(b"SSH-2.0-test\r\n").await;
    let cfg = ScanConfig::new(ResolvedTarget::from(LOCALHOST), around(server.port, 10))
        .with_concurrency(NonZeroUsize::new(8).unwrap());
    let service = service();

    let first = service.profile(&cfg, None).await.unwrap();
    let second = service.profile(&cfg, None).await.unwrap();

    assert_eq!(first.scan.open_ports, second.scan.open_ports);
    assert_eq!(
        second.services.get(server.port),
        Some(&Banner::Text("SSH-2.0-test".into()))
    );
}

#[tokio::test]
async fn hostname_target_is_resolved_before_scanning() {
    let server = banner_server(b"HELLO\n").await;
    let target: Target = "localhost".parse().unwrap();
    let resolved = target.resolve().await.unwrap();
    assert!(resolved.addr.is_loopback());
    // only IPv4 listeners are bound here
    if !resolved.addr.is_ipv4() {
        return;
    }

    let cfg = ScanConfig::new(resolved, PortRange::new(server.port, server.port).unwrap());
    let profile = service().profile(&cfg, None).await.unwrap();

    assert_eq!(profile.target.name, "localhost");
    assert_eq!(profile.scan.open_ports, vec![server.port]);
}

#[tokio::test]
async fn deadline_returns_partial_results() {
    let range = PortRange::new(1, 65535).unwrap();
    let scanner = PortScanner::new(Arc::new(TcpConnector), Duration::from_millis(200))
        .with_max_duration(Some(Duration::from_millis(50)));

    let result = scanner.scan(LOCALHOST, range).await;

    assert!(result.interrupted);
    assert!(result.attempted < range.len());
    assert!(result.elapsed < Duration::from_secs(2));
}
