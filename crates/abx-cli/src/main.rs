use clap::Parser;
use eyre::Result;
use tracing::{debug, info};

use abx_cli::cli::Cli;
use abx_cli::config::{load_config, load_config_from};
use abx_cli::{commands, logging};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    logging::init(cli.effective_log_format(loaded.config.log_format));

    if let Some(from) = loaded.migrated_from {
        info!(path = %loaded.path.display(), from, "migrated config to current version");
    }
    debug!(path = %loaded.path.display(), found = loaded.found, "config loaded");

    commands::run(&cli, &loaded)
}
