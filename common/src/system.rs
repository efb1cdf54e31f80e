//! Facts about the machine running the scan.

use std::net::IpAddr;

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    pub name: String,
    pub version: String,
    pub platform: String,
    pub processor: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkIdentity {
    pub hostname: String,
    pub ip_addr: IpAddr,
}

/// Everything the report says about the scanning machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    pub os: OsInfo,
    pub network: NetworkIdentity,
}

/// Source of local system facts. Never talks to the scan target.
pub trait SystemRepository: Send + Sync {
    fn get_os_info(&self) -> anyhow::Result<OsInfo>;
    fn get_network_identity(&self) -> anyhow::Result<NetworkIdentity>;
}

/// Replaces blank values so every field in a profile has something to show.
pub fn or_unknown(value: impl Into<String>) -> String {
    let value: String = value.into();
    if value.trim().is_empty() {
        UNKNOWN.to_string()
    } else {
        value.trim().to_string()
    }
}
