use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use eyre::WrapErr;
use serde::Serialize;
use tracing::info;

use abx_breakpoints::catalog::BreakpointCatalog;
use abx_breakpoints::source::FileSource;
use abx_engine::request::SusceptibilityInput;
use abx_engine::{CaseRequest, Engine};
use abx_regimens::catalog::RegimenCatalog;

use crate::cli::{Cli, Command, ConfigAction};
use crate::config::{AbxConfig, LoadedConfig, save_config_to};

/// Build the engine from command-line overrides, then config paths, then the
/// embedded knowledge bases.
pub fn build_engine(cli: &Cli, config: &AbxConfig) -> eyre::Result<Engine> {
    let breakpoints = match cli.breakpoints.as_ref().or(config.breakpoints_path.as_ref()) {
        Some(path) => Arc::new(BreakpointCatalog::load(&FileSource::new(path))?),
        None => BreakpointCatalog::embedded()?,
    };
    let regimens = match cli.regimens.as_ref().or(config.regimens_path.as_ref()) {
        Some(path) => Arc::new(RegimenCatalog::load(&FileSource::new(path))?),
        None => RegimenCatalog::embedded()?,
    };
    Ok(Engine::new(breakpoints, regimens).with_default_rates(config.resistance_defaults()?))
}

pub fn read_request(path: &Path) -> eyre::Result<CaseRequest> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read request {}", path.display()))?
    };
    serde_json::from_str(&text).wrap_err("request is not a valid case request")
}

fn print_json<T: Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run(cli: &Cli, loaded: &LoadedConfig) -> eyre::Result<()> {
    let config = &loaded.config;
    match &cli.command {
        Command::Config { action } => match action {
            ConfigAction::Show => print_json(&serde_json::json!({
                "path": loaded.path,
                "found": loaded.found,
                "config": config,
            })),
            ConfigAction::Init => {
                if loaded.found {
                    info!(path = %loaded.path.display(), "config already exists");
                    return Ok(());
                }
                save_config_to(&loaded.path, config)
            }
        },
        Command::Classify { organism } => {
            let engine = build_engine(cli, config)?;
            print_json(&engine.classify(organism))
        }
        Command::Interpret {
            organism,
            antibiotic,
            value,
            disk,
            syndrome,
        } => {
            let engine = build_engine(cli, config)?;
            let classification = engine.classify(organism);
            let input = if *disk {
                SusceptibilityInput::disk(antibiotic, value)
            } else {
                SusceptibilityInput::mic(antibiotic, value)
            };
            let site = syndrome.map(|s| s.site());
            print_json(&engine.interpret_for(&classification, &input, site))
        }
        Command::Recommend { request } => {
            let engine = build_engine(cli, config)?;
            let mut request = read_request(request)?;
            config.apply_institution(&mut request.case);
            let report = engine.recommend(&request)?;
            info!(
                request_id = %report.request_id,
                recommended = report.selection.is_recommended(),
                "case processed"
            );
            print_json(&report)
        }
    }
}
