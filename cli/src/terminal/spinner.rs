use colored::*;
use indicatif::ProgressStyle;
use sonar_core::scanner::ScanProgress;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

const SCAN_TEMPLATE: &str = "{spinner:.blue} {msg} {bar:24.green/bright_black} {pos}/{len}";
const PROBE_TEMPLATE: &str = "{spinner:.blue} {msg}";

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICK_STRINGS)
}

/// Span carrying the progress bar of the scan phase.
pub fn scan_span(target: &str, total: usize) -> Span {
    let span = info_span!("scan", indicatif.pb_show = true);
    span.pb_set_style(&style(SCAN_TEMPLATE));
    span.pb_set_length(total as u64);
    span.pb_set_message(&format!("Scanning {}", target.bold()));
    span
}

/// Span carrying the spinner of the probe phase.
pub fn probe_span(open_ports: usize) -> Span {
    let span = info_span!("probe", indicatif.pb_show = true);
    span.pb_set_style(&style(PROBE_TEMPLATE));
    span.pb_set_message(&format!(
        "Grabbing banners from {} open port(s)...",
        open_ports.to_string().green().bold()
    ));
    span
}

pub fn report_scan_progress(span: &Span, progress: ScanProgress) {
    span.pb_set_position(progress.attempted as u64);
    if progress.open > 0 {
        span.pb_set_message(&format!(
            "Found {} open port(s) so far",
            progress.open.to_string().green().bold()
        ));
    }
}
