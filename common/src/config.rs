use std::num::NonZeroUsize;
use std::time::Duration;

use crate::network::range::PortRange;
use crate::network::target::ResolvedTarget;

pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_CONCURRENCY: NonZeroUsize = NonZeroUsize::MIN;

/// Presentation settings for the terminal.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// `0` prints the full report. Anything higher drops banners and rules.
    pub quiet: u8,
}

/// Everything a single profile run needs, built once at the boundary.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub target: ResolvedTarget,
    pub ports: PortRange,
    /// Number of connection attempts allowed in flight at once.
    pub concurrency: NonZeroUsize,
    /// Connect timeout while sweeping the range.
    pub scan_timeout: Duration,
    /// Connect and read timeout while grabbing banners.
    pub probe_timeout: Duration,
    /// Wall-clock cap for the sweep. `None` scans the whole range.
    pub max_duration: Option<Duration>,
}

impl ScanConfig {
    pub fn new(target: ResolvedTarget, ports: PortRange) -> Self {
        Self {
            target,
            ports,
            concurrency: DEFAULT_CONCURRENCY,
            scan_timeout: DEFAULT_SCAN_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_duration: None,
        }
    }

    pub fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_scan_timeout(mut self, scan_timeout: Duration) -> Self {
        self.scan_timeout = scan_timeout;
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }
}
