use std::path::PathBuf;

use clap::{Parser, Subcommand};

use abx_core::models::case::InfectionSyndrome;

use crate::config::{CONFIG_ENV, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "abx", version, about = "Antimicrobial breakpoint interpretation and regimen selection")]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Breakpoint knowledge base JSON, overriding config and the embedded set.
    #[arg(long, global = true)]
    pub breakpoints: Option<PathBuf>,

    /// Regimen knowledge base JSON, overriding config and the embedded set.
    #[arg(long, global = true)]
    pub regimens: Option<PathBuf>,

    /// Shorthand for `--log-format json`.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Command-line flags win over the config file.
    pub fn effective_log_format(&self, configured: LogFormat) -> LogFormat {
        if self.json_logs {
            return LogFormat::Json;
        }
        self.log_format.unwrap_or(configured)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Map an organism identifier to its breakpoint category.
    Classify { organism: String },

    /// Interpret one susceptibility result.
    Interpret {
        organism: String,
        antibiotic: String,
        /// MIC (`≤0.5`, `4/76`, `2-4`), zone diameter, or a reported category.
        value: String,
        /// Treat the value as a disk-diffusion zone diameter in mm.
        #[arg(long)]
        disk: bool,
        /// Syndrome whose site-specific breakpoints apply.
        #[arg(long)]
        syndrome: Option<InfectionSyndrome>,
    },

    /// Run the full pipeline for a case request (JSON file, or `-` for stdin).
    Recommend { request: PathBuf },

    /// Inspect or create the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective config and where it was read from.
    Show,
    /// Write a default config file if none exists.
    Init,
}
