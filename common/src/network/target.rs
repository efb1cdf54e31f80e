//! # Scan Target Model
//!
//! Defines the host a profile is taken of.
//!
//! A target is given as either:
//! * An IPv4 or IPv6 address literal (e.g. `192.168.1.5`, `::1`).
//! * A hostname that the system resolver can turn into an address (e.g. `example.com`).
//!
//! Parsing only checks the shape of the input. [`Target::resolve`] performs the
//! lookup exactly once, so the scanner never touches DNS per port.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::error::TargetError;

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A host as typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// An address literal, no resolution needed.
    Host { target_addr: IpAddr },
    /// A DNS name, resolved before scanning.
    Name { hostname: String },
}

/// A target whose address is known. Immutable for the lifetime of a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// What the user typed, kept for the report.
    pub name: String,
    pub addr: IpAddr,
}

impl ResolvedTarget {
    pub fn new(name: impl Into<String>, addr: IpAddr) -> Self {
        Self {
            name: name.into(),
            addr,
        }
    }
}

impl From<IpAddr> for ResolvedTarget {
    fn from(addr: IpAddr) -> Self {
        Self::new(addr.to_string(), addr)
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.addr.to_string() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{} ({})", self.name, self.addr)
        }
    }
}

impl FromStr for Target {
    type Err = TargetError;

    /// Parses a string into a `Target`.
    ///
    /// Supported formats:
    /// * **Host**: Single IPv4/IPv6 address (e.g., "10.0.0.1", "::1").
    /// * **Name**: RFC 1123 hostname (e.g., "localhost", "mail.example.org").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(TargetError::EmptyHost);
        }

        if let Some(target) = parse_host(s) {
            return Ok(target);
        }

        if let Some(target) = parse_hostname(s) {
            return Ok(target);
        }

        Err(TargetError::InvalidHost(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Host { target_addr } => write!(f, "{target_addr}"),
            Target::Name { hostname } => write!(f, "{hostname}"),
        }
    }
}

impl Target {
    /// Turns the target into a single address.
    ///
    /// Address literals resolve to themselves. Hostnames go through the system
    /// resolver; IPv4 answers are preferred, matching what most services bind.
    pub async fn resolve(&self) -> Result<ResolvedTarget, TargetError> {
        match self {
            Target::Host { target_addr } => Ok(ResolvedTarget::from(*target_addr)),
            Target::Name { hostname } => {
                let unresolvable = |reason: String| TargetError::Unresolvable {
                    host: hostname.clone(),
                    reason,
                };

                let addrs: Vec<SocketAddr> = tokio::net::lookup_host((hostname.as_str(), 0))
                    .await
                    .map_err(|e| unresolvable(e.to_string()))?
                    .collect();

                let addr: IpAddr = pick_address(&addrs)
                    .ok_or_else(|| unresolvable("no addresses returned".to_string()))?;

                Ok(ResolvedTarget::new(hostname.clone(), addr))
            }
        }
    }
}

fn pick_address(addrs: &[SocketAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .map(SocketAddr::ip)
}

/// Parses a single IP address.
fn parse_host(s: &str) -> Option<Target> {
    s.parse::<IpAddr>()
        .ok()
        .map(|target_addr| Target::Host { target_addr })
}

/// Accepts dotted names made of 1-63 character labels of letters, digits,
/// hyphens and underscores. A single trailing dot is allowed.
fn parse_hostname(s: &str) -> Option<Target> {
    let name = s.strip_suffix('.').unwrap_or(s);

    if name.is_empty() || name.len() > MAX_HOSTNAME_LEN {
        return None;
    }

    // All-numeric dotted input that failed IP parsing is a typo, not a name.
    if name.split('.').all(|label| label.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    name.split('.').all(is_valid_label).then(|| Target::Name {
        hostname: name.to_ascii_lowercase(),
    })
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
