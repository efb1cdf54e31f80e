pub mod profile;

use std::num::NonZeroUsize;

use clap::{ArgAction, Parser};
use sonar_common::network::range::PortRange;
use sonar_common::network::target::Target;

#[derive(Parser)]
#[command(name = "sonar")]
#[command(version)]
#[command(about = "Profiles this machine and the open TCP services of a remote host.")]
pub struct CommandLine {
    /// IP address or hostname to scan. Asked for when left out
    pub target: Option<Target>,

    /// First port of the range
    #[arg(short, long, conflicts_with = "ports")]
    pub start: Option<u16>,

    /// Last port of the range
    #[arg(short, long, conflicts_with = "ports")]
    pub end: Option<u16>,

    /// Port range as START-END, or a single port
    #[arg(short, long)]
    pub ports: Option<PortRange>,

    /// Connection attempts allowed in flight at once
    #[arg(short, long, default_value = "1")]
    pub concurrency: NonZeroUsize,

    /// Connect timeout per port while sweeping, in milliseconds
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Connect and read timeout per port while grabbing banners, in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub probe_timeout: u64,

    /// Stop sweeping after this many seconds and report what was found
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_duration: Option<u64>,

    /// Less decoration; repeat for bare results
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The range given as flags, if any bound was given at all.
    pub fn explicit_range(&self) -> Option<(Option<u16>, Option<u16>)> {
        if let Some(range) = self.ports {
            return Some((Some(range.start()), Some(range.end())));
        }
        match (self.start, self.end) {
            (None, None) => None,
            bounds => Some(bounds),
        }
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
