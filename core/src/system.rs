use std::env;
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};

use anyhow::Context;
use sysinfo::{CpuExt, System, SystemExt};
use tracing::debug;

use sonar_common::system::{NetworkIdentity, OsInfo, SystemRepository, or_unknown};

use crate::network::interface;

/// Reads facts from the running operating system.
pub struct SystemRepo;

impl SystemRepository for SystemRepo {
    fn get_os_info(&self) -> anyhow::Result<OsInfo> {
        let name: String = sys_info::os_type().unwrap_or_else(|_| env::consts::OS.to_string());
        let release: String = sys_info::os_release().unwrap_or_default();

        let mut sys = System::new();
        sys.refresh_cpu();

        let version: String = sys
            .long_os_version()
            .or_else(|| sys.os_version())
            .unwrap_or_else(|| release.clone());

        let processor: String = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().to_string())
            .filter(|brand| !brand.trim().is_empty())
            .unwrap_or_else(|| env::consts::ARCH.to_string());

        Ok(OsInfo {
            platform: platform_descriptor(&name, &release),
            name: or_unknown(name),
            version: or_unknown(version),
            processor: or_unknown(processor),
        })
    }

    fn get_network_identity(&self) -> anyhow::Result<NetworkIdentity> {
        let hostname: String = sys_info::hostname().context("reading the local hostname")?;

        let ip_addr: IpAddr = resolve_hostname(&hostname)
            .filter(|ip| !ip.is_loopback())
            .or_else(|| {
                debug!("{hostname} does not resolve to a routable address, asking the interfaces");
                interface::get_primary_ipv4()
            })
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        Ok(NetworkIdentity {
            hostname: or_unknown(hostname),
            ip_addr,
        })
    }
}

/// `<os>-<release>-<arch>`, e.g. `Linux-6.8.0-45-generic-x86_64`.
fn platform_descriptor(name: &str, release: &str) -> String {
    [name, release, env::consts::ARCH]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

fn resolve_hostname(hostname: &str) -> Option<IpAddr> {
    let addrs: Vec<IpAddr> = (hostname, 0)
        .to_socket_addrs()
        .ok()?
        .map(|addr| addr.ip())
        .collect();

    addrs
        .iter()
        .find(|ip| ip.is_ipv4() && !ip.is_loopback())
        .or_else(|| addrs.first())
        .copied()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
