use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::TargetError;

pub const DEFAULT_START_PORT: u16 = 1;
pub const DEFAULT_END_PORT: u16 = 1024;

/// An inclusive range of TCP ports, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub fn new(start: u16, end: u16) -> Result<Self, TargetError> {
        if start > end {
            return Err(TargetError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports in the range. Never zero.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.start..=self.end).contains(&port)
    }

    pub fn to_iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_PORT,
            end: DEFAULT_END_PORT,
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for PortRange {
    type Err = TargetError;

    /// Parses `"start-end"` or a single `"port"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((start_str, end_str)) => Self::new(parse_port(start_str)?, parse_port(end_str)?),
            None => {
                let port = parse_port(s)?;
                Self::new(port, port)
            }
        }
    }
}

/// Parses a single port number, tolerating surrounding whitespace.
pub fn parse_port(s: &str) -> Result<u16, TargetError> {
    let trimmed = s.trim();
    trimmed
        .parse::<u16>()
        .map_err(|_| TargetError::InvalidPort(trimmed.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
