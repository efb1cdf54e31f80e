use std::net::IpAddr;

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

/// Returns up, non-loopback interfaces that carry an address, wired ones first.
pub fn get_prioritized_interfaces(limit: usize) -> Vec<NetworkInterface> {
    let mut interfaces: Vec<NetworkInterface> = datalink::interfaces()
        .into_iter()
        .filter(|i| i.is_up() && !i.is_loopback() && !i.ips.is_empty())
        .collect();

    interfaces.sort_by_key(interface_rank);
    interfaces.into_iter().take(limit).collect()
}

/// First IPv4 address on the highest ranked interface.
pub fn get_primary_ipv4() -> Option<IpAddr> {
    get_prioritized_interfaces(usize::MAX)
        .iter()
        .find_map(first_ipv4)
}

fn first_ipv4(interface: &NetworkInterface) -> Option<IpAddr> {
    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) if !v4.ip().is_loopback() => Some(IpAddr::V4(v4.ip())),
        _ => None,
    })
}

// Name based: en*/eth* are wired, wl* is wireless, the rest are virtual or tunnels.
fn interface_rank(interface: &NetworkInterface) -> u8 {
    let name = interface.name.as_str();
    if name.starts_with("en") || name.starts_with("eth") {
        0
    } else if name.starts_with("wl") {
        1
    } else {
        2
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
