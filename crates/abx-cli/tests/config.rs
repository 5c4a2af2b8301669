use std::collections::BTreeMap;

use abx_cli::config::{
    AbxConfig, CURRENT_VERSION, LogFormat, load_config_from, migrate, save_config_to,
};
use abx_core::models::case::{CaseContext, InstitutionType, LocalResistanceRates};
use serde_json::json;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = load_config_from(&dir.path().join("config.json")).unwrap();
    assert!(!loaded.found);
    assert_eq!(loaded.config.config_version, CURRENT_VERSION);
    assert_eq!(loaded.config.log_format, LogFormat::Human);
    assert!(loaded.config.local_rates.is_empty());
}

#[test]
fn v0_config_is_migrated() {
    let v0 = json!({
        "knowledge_base": "/srv/abx/m100.json",
        "resistance_rates": { "klebsiella": { "esbl": 0.3, "carbapenem": 0.08 } }
    });
    let migrated = migrate(v0, 0).unwrap();
    assert_eq!(migrated["config_version"], 1);
    assert_eq!(migrated["breakpoints_path"], "/srv/abx/m100.json");
    assert_eq!(migrated["local_rates"]["klebsiella"]["esbl_rate"], 0.3);
    assert!(migrated.get("knowledge_base").is_none());

    let config: AbxConfig = serde_json::from_value(migrated).unwrap();
    assert_eq!(config.local_rates["klebsiella"].carbapenem_resistance_rate, Some(0.08));
}

#[test]
fn migration_is_reported_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "knowledge_base": "kb.json" }"#).unwrap();
    let loaded = load_config_from(&path).unwrap();
    assert!(loaded.found);
    assert_eq!(loaded.migrated_from, Some(0));
    assert_eq!(loaded.config.breakpoints_path.as_deref(), Some(std::path::Path::new("kb.json")));
}

#[test]
fn newer_versions_are_refused() {
    let err = migrate(json!({ "config_version": 99 }), 99).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = AbxConfig {
        local_rates: BTreeMap::from([(
            "escherichia".to_string(),
            LocalResistanceRates {
                esbl_rate: Some(0.22),
                ..Default::default()
            },
        )]),
        institution_type: Some(InstitutionType::Tertiary),
        log_format: LogFormat::Json,
        ..Default::default()
    };
    save_config_to(&path, &config).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.migrated_from, None);
    assert_eq!(loaded.config.config_version, CURRENT_VERSION);
    assert_eq!(loaded.config.local_rates, config.local_rates);
    assert_eq!(loaded.config.log_format, LogFormat::Json);
}

#[test]
fn configured_rates_become_engine_defaults() {
    let config = AbxConfig {
        local_rates: BTreeMap::from([(
            "klebsiella".to_string(),
            LocalResistanceRates {
                carbapenem_resistance_rate: Some(0.2),
                ..Default::default()
            },
        )]),
        ..Default::default()
    };
    let rates = config.resistance_defaults().unwrap().rates_for("klebsiella");
    assert_eq!(rates.carbapenem_resistance_rate, 0.2);
    assert_eq!(rates.esbl_rate, 0.25);
}

#[test]
fn invalid_configured_rates_are_rejected() {
    let config = AbxConfig {
        local_rates: BTreeMap::from([(
            "klebsiella".to_string(),
            LocalResistanceRates {
                esbl_rate: Some(25.0),
                ..Default::default()
            },
        )]),
        ..Default::default()
    };
    let err = config.resistance_defaults().unwrap_err();
    assert!(err.to_string().contains("local_rates.klebsiella"));
}

#[test]
fn institution_fills_only_missing_values() {
    let config = AbxConfig {
        institution_type: Some(InstitutionType::LongTermCare),
        ..Default::default()
    };

    let mut bare = CaseContext::default();
    config.apply_institution(&mut bare);
    assert_eq!(
        bare.local_rates.and_then(|r| r.institution_type),
        Some(InstitutionType::LongTermCare)
    );

    let mut stated = CaseContext {
        local_rates: Some(LocalResistanceRates {
            institution_type: Some(InstitutionType::Community),
            ..Default::default()
        }),
        ..Default::default()
    };
    config.apply_institution(&mut stated);
    assert_eq!(
        stated.local_rates.and_then(|r| r.institution_type),
        Some(InstitutionType::Community)
    );
}
