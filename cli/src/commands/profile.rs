use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use colored::*;
use tracing::Instrument;

use crate::commands::CommandLine;
use crate::mprint;
use crate::terminal::{colors, format, input, print, spinner};
use sonar_common::config::{Config, ScanConfig};
use sonar_common::network::port::{ScanResult, ServiceMap};
use sonar_common::network::range::{DEFAULT_END_PORT, DEFAULT_START_PORT, PortRange};
use sonar_common::network::target::{ResolvedTarget, Target};
use sonar_common::system::HostProfile;
use sonar_common::{info, success, warn};
use sonar_core::network::tcp::TcpConnector;
use sonar_core::profile::ProfileService;
use sonar_core::scanner::{ProgressCallback, ScanProgress};
use sonar_core::system::SystemRepo;

pub async fn profile(commands: CommandLine, cfg: &Config) -> anyhow::Result<()> {
    let scan_cfg: ScanConfig = build_scan_config(&commands).await?;
    let service = ProfileService::new(Box::new(SystemRepo), Arc::new(TcpConnector));

    let host: HostProfile = service
        .inspect_host()
        .context("collecting information about this machine")?;
    print_host(&host, cfg);

    let scan: ScanResult = run_scan(&service, &scan_cfg).await;

    if scan.interrupted {
        warn!(
            "Stopped after {}s, {} of {} ports were checked",
            scan.elapsed.as_secs(),
            scan.attempted,
            scan_cfg.ports.len()
        );
    }

    if scan.is_empty() {
        no_ports_found(cfg);
    } else {
        let services: ServiceMap = run_probe(&service, &scan_cfg, &scan.open_ports).await;
        print_services(&services, cfg);
    }

    print_summary(&scan_cfg.target, &scan, cfg);
    Ok(())
}

async fn build_scan_config(commands: &CommandLine) -> anyhow::Result<ScanConfig> {
    let target: Target = match &commands.target {
        Some(target) => target.clone(),
        None => input::ask("Enter the target IP address")?.parse()?,
    };

    let ports: PortRange = match commands.explicit_range() {
        Some((start, end)) => PortRange::new(
            start.unwrap_or(DEFAULT_START_PORT),
            end.unwrap_or(DEFAULT_END_PORT),
        )?,
        None if commands.target.is_none() => {
            let start: u16 = input::ask_port("Enter the starting port", DEFAULT_START_PORT)?;
            let end: u16 = input::ask_port("Enter the ending port", DEFAULT_END_PORT)?;
            PortRange::new(start, end)?
        }
        None => PortRange::default(),
    };

    let resolved: ResolvedTarget = target.resolve().await?;
    info!("Target {resolved}, ports {ports}");

    Ok(ScanConfig::new(resolved, ports)
        .with_concurrency(commands.concurrency)
        .with_scan_timeout(Duration::from_millis(commands.timeout))
        .with_probe_timeout(Duration::from_millis(commands.probe_timeout))
        .with_max_duration(commands.max_duration.map(Duration::from_secs)))
}

async fn run_scan(service: &ProfileService<TcpConnector>, scan_cfg: &ScanConfig) -> ScanResult {
    let span = spinner::scan_span(&scan_cfg.target.to_string(), scan_cfg.ports.len());
    let progress_span = span.clone();
    let on_progress: ProgressCallback = Arc::new(move |progress: ScanProgress| {
        spinner::report_scan_progress(&progress_span, progress)
    });

    service
        .scan(scan_cfg, Some(on_progress))
        .instrument(span)
        .await
}

async fn run_probe(
    service: &ProfileService<TcpConnector>,
    scan_cfg: &ScanConfig,
    open_ports: &[u16],
) -> ServiceMap {
    let span = spinner::probe_span(open_ports.len());
    service.probe(scan_cfg, open_ports).instrument(span).await
}

fn print_host(host: &HostProfile, cfg: &Config) {
    print::GLOBAL_KEY_WIDTH.set(10);

    print::section("Operating System Information", cfg.quiet);
    print::aligned_line("OS", host.os.name.as_str());
    print::aligned_line("OS Version", host.os.version.as_str());
    print::aligned_line("Platform", host.os.platform.as_str());
    print::aligned_line("Processor", host.os.processor.as_str());
    mprint!();

    print::section("Network Information", cfg.quiet);
    print::aligned_line("Hostname", host.network.hostname.as_str());
    print::aligned_line("IP Address", format::ip_to_value(&host.network.ip_addr));
    mprint!();
}

fn no_ports_found(cfg: &Config) {
    print::section("Open Ports", cfg.quiet);
    print::print_status("No open ports found.");
}

fn print_services(services: &ServiceMap, cfg: &Config) {
    let widest: usize = services
        .iter()
        .map(|entry| format!("Port {}", entry.port).len())
        .max()
        .unwrap_or(0);
    print::GLOBAL_KEY_WIDTH.set(widest.max(4));

    print::section("Open Ports Found", cfg.quiet);
    for entry in services.iter() {
        let mut lines = format::banner_to_lines(&entry.banner).into_iter();
        let first: ColoredString = lines.next().unwrap_or_default();
        print::aligned_line(&format!("Port {}", entry.port), first);
        for line in lines {
            print::continuation_line(line);
        }
    }
}

fn print_summary(target: &ResolvedTarget, scan: &ScanResult, cfg: &Config) {
    let open: ColoredString = format::port_count(scan.open_count()).bold().green();
    let checked: ColoredString = format::port_count(scan.attempted).bold();
    let total_time: ColoredString = format!("{:.2}s", scan.elapsed.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!(
        "Profile Complete: {open} open on {} ({checked} checked in {total_time})",
        target.name.bold()
    )
    .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            mprint!();
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => {
            mprint!();
            success!("{}", output)
        }
    }
}
