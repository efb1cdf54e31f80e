mod commands;
mod terminal;

use commands::{CommandLine, profile};
use sonar_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init()?;

    let cfg = Config {
        quiet: commands.quiet,
    };

    print::banner(cfg.quiet);
    profile::profile(commands, &cfg).await
}
