use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vibegate::cli::{commands, Cli};
use vibegate::config::VibeGateConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = VibeGateConfig::load()?;
    init_logging(&config);

    commands::run(cli, &config)
}

fn init_logging(config: &VibeGateConfig) {
    // Banners go to stdout; diagnostics stay on stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
