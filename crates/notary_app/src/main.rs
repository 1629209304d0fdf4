mod app;
mod config;
mod effects;
mod input;
mod render;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use notary_logging::{notary_info, LogDestination};

use crate::config::{config_path, AppConfig};

/// Polls notarization history for the configured developer accounts.
#[derive(Debug, Parser)]
#[command(name = "notary-poller", version, about)]
struct Cli {
    /// RON config file. Defaults to ./notary.ron; a missing file means built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Account selected at startup instead of the first configured one.
    #[arg(short, long)]
    account: Option<String>,

    /// Overrides the configured log destination.
    #[arg(long, value_enum)]
    log: Option<LogTarget>,

    /// Overrides the configured log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let path = config_path(cli.config);
    let mut config = AppConfig::load(&path)?;
    if let Some(target) = cli.log {
        config.log.destination = target.into();
    }
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }

    notary_logging::initialize(&config.log);
    notary_info!(
        "Starting notary poller with {} configured account(s) from {:?}",
        config.accounts.len(),
        path
    );

    app::run_app(config, cli.account)
}
