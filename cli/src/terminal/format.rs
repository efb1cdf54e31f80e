use crate::terminal::colors;
use colored::*;
use sonar_common::network::port::{Banner, NO_BANNER};
use std::net::IpAddr;

/// Longest banner line shown before it gets cut.
const MAX_LINE_WIDTH: usize = 96;
/// Banners longer than this many lines are cut short.
const MAX_LINES: usize = 6;

pub fn ip_to_value(ip: &IpAddr) -> ColoredString {
    match ip {
        IpAddr::V4(ipv4_addr) => ipv4_addr.to_string().color(colors::IPV4_ADDR),
        IpAddr::V6(ipv6_addr) => ipv6_addr.to_string().color(colors::IPV6_ADDR),
    }
}

/// Splits a banner into printable lines.
///
/// Control characters would move the cursor around the report, so anything
/// other than a plain space is shown as `.`.
pub fn banner_to_lines(banner: &Banner) -> Vec<ColoredString> {
    let Some(text) = banner.as_text() else {
        return vec![NO_BANNER.color(colors::NO_BANNER).italic()];
    };

    let mut lines: Vec<ColoredString> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .take(MAX_LINES)
        .map(|line| sanitize(line).color(colors::BANNER))
        .collect();

    if text.lines().filter(|line| !line.trim_end().is_empty()).count() > MAX_LINES {
        lines.push("…".color(colors::SEPARATOR));
    }

    lines
}

fn sanitize(line: &str) -> String {
    let mut cleaned: String = line
        .chars()
        .map(|c| match c {
            '\t' => ' ',
            c if c.is_control() => '.',
            c => c,
        })
        .take(MAX_LINE_WIDTH)
        .collect();

    if line.chars().count() > MAX_LINE_WIDTH {
        cleaned.push('…');
    }
    cleaned
}

pub fn port_count(count: usize) -> String {
    let unit: &str = if count == 1 { "port" } else { "ports" };
    format!("{count} {unit}")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
