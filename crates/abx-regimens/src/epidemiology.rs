//! Local epidemiology risk from per-genus resistance rates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use abx_core::models::assessment::{EpidemiologyContext, RateSource, RiskLevel, ScoreFactor};
use abx_core::models::case::{InstitutionType, LocalResistanceRates};
use abx_core::normalize_key;

use crate::error::RegimenError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenusRates {
    pub esbl_rate: f64,
    pub carbapenem_resistance_rate: f64,
}

impl GenusRates {
    pub const fn new(esbl_rate: f64, carbapenem_resistance_rate: f64) -> Self {
        Self {
            esbl_rate,
            carbapenem_resistance_rate,
        }
    }
}

const STANDARD_RATES: &[(&str, GenusRates)] = &[
    ("escherichia", GenusRates::new(0.15, 0.01)),
    ("klebsiella", GenusRates::new(0.25, 0.05)),
    ("enterobacter", GenusRates::new(0.20, 0.05)),
    ("citrobacter", GenusRates::new(0.15, 0.03)),
    ("serratia", GenusRates::new(0.10, 0.02)),
    ("proteus", GenusRates::new(0.10, 0.01)),
    ("pseudomonas", GenusRates::new(0.0, 0.20)),
    ("acinetobacter", GenusRates::new(0.0, 0.45)),
];

const FALLBACK_RATES: GenusRates = GenusRates::new(0.05, 0.01);

/// Baseline resistance rates by genus, used when a case supplies none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceDefaults {
    by_genus: BTreeMap<String, GenusRates>,
    fallback: GenusRates,
}

impl Default for ResistanceDefaults {
    fn default() -> Self {
        Self::standard()
    }
}

impl ResistanceDefaults {
    pub fn standard() -> Self {
        Self {
            by_genus: STANDARD_RATES
                .iter()
                .map(|(genus, rates)| (genus.to_string(), *rates))
                .collect(),
            fallback: FALLBACK_RATES,
        }
    }

    pub fn rates_for(&self, genus: &str) -> GenusRates {
        self.by_genus
            .get(&normalize_key(genus, '_'))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Replace the baseline for one genus. Fields left `None` keep the
    /// current value.
    pub fn apply(&mut self, genus: &str, overrides: &LocalResistanceRates) -> Result<(), RegimenError> {
        overrides.validate()?;
        let mut rates = self.rates_for(genus);
        if let Some(esbl) = overrides.esbl_rate {
            rates.esbl_rate = esbl;
        }
        if let Some(cr) = overrides.carbapenem_resistance_rate {
            rates.carbapenem_resistance_rate = cr;
        }
        self.by_genus.insert(normalize_key(genus, '_'), rates);
        Ok(())
    }
}

fn esbl_points(rate: f64) -> i32 {
    if rate >= 0.20 {
        2
    } else if rate >= 0.10 {
        1
    } else {
        0
    }
}

fn carbapenem_points(rate: f64) -> i32 {
    if rate >= 0.10 {
        2
    } else if rate >= 0.05 {
        1
    } else {
        0
    }
}

pub fn risk_level(score: i32) -> RiskLevel {
    match score {
        i32::MIN..=1 => RiskLevel::Low,
        2..=3 => RiskLevel::Moderate,
        _ => RiskLevel::High,
    }
}

/// Compare the rates for `genus` (case overrides first, then defaults)
/// against fixed thresholds. Fails only on out-of-range override values.
pub fn assess_epidemiology(
    genus: &str,
    local: Option<&LocalResistanceRates>,
    defaults: &ResistanceDefaults,
) -> Result<EpidemiologyContext, RegimenError> {
    if let Some(local) = local {
        local.validate()?;
    }
    let baseline = defaults.rates_for(genus);

    let (esbl_rate, esbl_rate_source) = match local.and_then(|l| l.esbl_rate) {
        Some(rate) => (rate, RateSource::LocalOverride),
        None => (baseline.esbl_rate, RateSource::Default),
    };
    let (carbapenem_resistance_rate, carbapenem_resistance_rate_source) =
        match local.and_then(|l| l.carbapenem_resistance_rate) {
            Some(rate) => (rate, RateSource::LocalOverride),
            None => (baseline.carbapenem_resistance_rate, RateSource::Default),
        };
    let institution_type = local
        .and_then(|l| l.institution_type)
        .unwrap_or_default();

    let mut factors = Vec::new();
    let esbl = esbl_points(esbl_rate);
    if esbl > 0 {
        factors.push(ScoreFactor::new(
            format!("ESBL rate {:.0}%", esbl_rate * 100.0),
            esbl,
        ));
    }
    let cr = carbapenem_points(carbapenem_resistance_rate);
    if cr > 0 {
        factors.push(ScoreFactor::new(
            format!("carbapenem resistance rate {:.0}%", carbapenem_resistance_rate * 100.0),
            cr,
        ));
    }
    if matches!(institution_type, InstitutionType::Tertiary | InstitutionType::LongTermCare) {
        factors.push(ScoreFactor::new(institution_type.label(), 1));
    }

    let risk_score = factors.iter().map(|f| f.points).sum();
    Ok(EpidemiologyContext {
        genus: genus.to_string(),
        esbl_rate,
        esbl_rate_source,
        carbapenem_resistance_rate,
        carbapenem_resistance_rate_source,
        institution_type,
        risk_score,
        risk: risk_level(risk_score),
        factors,
    })
}
