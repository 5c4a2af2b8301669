use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use abx_core::models::case::{CaseContext, InstitutionType, LocalResistanceRates};
use abx_regimens::epidemiology::ResistanceDefaults;

/// On-disk config version written by this build. Older files are upgraded by
/// [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

pub const CONFIG_ENV: &str = "ABX_CONFIG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbxConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Breakpoint knowledge base to use instead of the embedded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoints_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regimens_path: Option<PathBuf>,
    /// Institution baseline resistance rates, keyed by genus.
    #[serde(default)]
    pub local_rates: BTreeMap<String, LocalResistanceRates>,
    /// Applied to cases that do not state their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_type: Option<InstitutionType>,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl AbxConfig {
    /// Built-in resistance defaults with this institution's rates applied.
    pub fn resistance_defaults(&self) -> eyre::Result<ResistanceDefaults> {
        let mut defaults = ResistanceDefaults::default();
        for (genus, rates) in &self.local_rates {
            defaults
                .apply(genus, rates)
                .map_err(|e| eyre::eyre!("config local_rates.{genus}: {e}"))?;
        }
        Ok(defaults)
    }

    /// Fill in the configured institution type where the case has none.
    pub fn apply_institution(&self, case: &mut CaseContext) {
        let Some(institution) = self.institution_type else {
            return;
        };
        let rates = case.local_rates.get_or_insert_with(LocalResistanceRates::default);
        rates.institution_type.get_or_insert(institution);
    }
}

/// A config as read from disk.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AbxConfig,
    pub path: PathBuf,
    /// False when no file existed and defaults were used.
    pub found: bool,
    /// On-disk version, when a migration ran.
    pub migrated_from: Option<u32>,
}

/// `$ABX_CONFIG`, else `<config dir>/abx/config.json`.
pub fn config_path() -> eyre::Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("abx").join("config.json"))
}

pub fn load_config() -> eyre::Result<LoadedConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> eyre::Result<LoadedConfig> {
    if !path.exists() {
        return Ok(LoadedConfig {
            config: AbxConfig {
                config_version: CURRENT_VERSION,
                ..Default::default()
            },
            path: path.to_path_buf(),
            found: false,
            migrated_from: None,
        });
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Migrations operate on the untyped value.
    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| eyre::eyre!("config at {} is not valid JSON: {e}", path.display()))?;
    let on_disk_version = json
        .get("config_version")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: AbxConfig = serde_json::from_value(migrated)
        .map_err(|e| eyre::eyre!("config at {} is invalid: {e}", path.display()))?;
    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        found: true,
        migrated_from: (on_disk_version < CURRENT_VERSION).then_some(on_disk_version),
    })
}

/// Upgrade a raw config from `from_version` to [`CURRENT_VERSION`], one step
/// at a time.
pub fn migrate(mut json: Value, from_version: u32) -> eyre::Result<Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update abx."
        ));
    }

    // v0 → v1: `knowledge_base` became `breakpoints_path`; `resistance_rates`
    // entries of {esbl, carbapenem} became `local_rates` entries.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(path) = obj.remove("knowledge_base") {
            obj.entry("breakpoints_path").or_insert(path);
        }
        if let Some(Value::Object(rates)) = obj.remove("resistance_rates") {
            let converted: Map<String, Value> = rates
                .into_iter()
                .map(|(genus, entry)| {
                    let mut out = Map::new();
                    if let Some(esbl) = entry.get("esbl") {
                        out.insert("esbl_rate".into(), esbl.clone());
                    }
                    if let Some(cr) = entry.get("carbapenem") {
                        out.insert("carbapenem_resistance_rate".into(), cr.clone());
                    }
                    (genus, Value::Object(out))
                })
                .collect();
            obj.entry("local_rates").or_insert(Value::Object(converted));
        }
        obj.insert("config_version".to_string(), Value::Number(1.into()));
    }

    Ok(json)
}

pub fn save_config_to(path: &Path, config: &AbxConfig) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
