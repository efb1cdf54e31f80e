//! Per-port results produced by the scan and probe phases.

use std::fmt;
use std::time::Duration;

pub const NO_BANNER: &str = "No banner detected";

/// Classification of a single connection attempt.
///
/// Only `Open` ports make it into a report. `Closed` and `Filtered` are kept
/// apart for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortState {
    /// The handshake completed.
    Open,
    /// The host actively refused the connection.
    Closed,
    /// No answer within the timeout, or the attempt failed for another reason.
    Filtered,
}

/// Text a service sent unprompted right after the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Banner {
    /// Non-empty, whitespace-trimmed text.
    Text(String),
    #[default]
    None,
}

impl Banner {
    /// Trims `raw` and keeps it only if something is left.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Banner::None
        } else {
            Banner::Text(trimmed.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Banner::Text(text) => Some(text),
            Banner::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Banner::None)
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text().unwrap_or(NO_BANNER))
    }
}

/// One open port and whatever it said when probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerEntry {
    pub port: u16,
    pub banner: Banner,
}

/// Banners keyed by port, in the order the ports were handed to the prober.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceMap {
    entries: Vec<BannerEntry>,
}

impl ServiceMap {
    pub fn new(entries: Vec<BannerEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, port: u16) -> Option<&Banner> {
        self.entries
            .iter()
            .find(|entry| entry.port == port)
            .map(|entry| &entry.banner)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BannerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ports(&self) -> Vec<u16> {
        self.entries.iter().map(|entry| entry.port).collect()
    }
}

impl IntoIterator for ServiceMap {
    type Item = BannerEntry;
    type IntoIter = std::vec::IntoIter<BannerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Outcome of one scan over a port range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Strictly ascending, no duplicates.
    pub open_ports: Vec<u16>,
    /// Ports for which a connection was actually attempted.
    pub attempted: usize,
    pub closed: usize,
    pub filtered: usize,
    pub elapsed: Duration,
    /// Set when the overall deadline stopped the scan before the range was drained.
    pub interrupted: bool,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.open_ports.is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.open_ports.len()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_from_text_trims_and_drops_blank() {
        assert_eq!(Banner::from_text("HELLO\n"), Banner::Text("HELLO".into()));
        assert_eq!(
            Banner::from_text("  SSH-2.0-OpenSSH_9.6\r\n"),
            Banner::Text("SSH-2.0-OpenSSH_9.6".into())
        );
        assert_eq!(Banner::from_text(" \r\n\t"), Banner::None);
        assert_eq!(Banner::from_text(""), Banner::None);
    }

    #[test]
    fn banner_display_uses_sentinel() {
        assert_eq!(Banner::None.to_string(), NO_BANNER);
        assert_eq!(Banner::Text("220 ftp".into()).to_string(), "220 ftp");
    }

    #[test]
    fn service_map_keeps_input_order() {
        let map = ServiceMap::new(vec![
            BannerEntry { port: 443, banner: Banner::None },
            BannerEntry { port: 22, banner: Banner::from_text("SSH") },
        ]);
        assert_eq!(map.ports(), vec![443, 22]);
        assert_eq!(map.get(22), Some(&Banner::Text("SSH".into())));
        assert_eq!(map.get(80), None);
    }
}
