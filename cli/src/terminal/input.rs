//! Interactive fallback for arguments left off the command line.

use std::io::{self, BufRead};

use anyhow::{Context, bail};
use colored::*;
use console::Term;
use sonar_common::network::range::parse_port;

use crate::terminal::colors;

/// Asks `question` on the terminal and returns the trimmed answer.
pub fn ask(question: &str) -> anyhow::Result<String> {
    let term = Term::stdout();
    term.write_str(&format!("{} {}: ", "?".color(colors::ACCENT).bold(), question))?;
    term.flush()?;

    let mut answer = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("reading from standard input")?;

    if read == 0 {
        bail!("no answer given for '{question}'");
    }

    Ok(answer.trim().to_string())
}

/// Asks for a port number; an empty answer picks `default`.
pub fn ask_port(question: &str, default: u16) -> anyhow::Result<u16> {
    let answer = ask(&format!("{question} [{default}]"))?;
    if answer.is_empty() {
        return Ok(default);
    }
    Ok(parse_port(&answer)?)
}
