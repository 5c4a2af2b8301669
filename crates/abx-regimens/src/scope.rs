//! Regimen scope: how intensive a regimen is, which resistance setting it is
//! written for, and which resistance mechanisms it covers.
//!
//! Regimens may declare their scope; otherwise it is read from the condition
//! text with the fixed phrase tables below. Phrases match on whole words of
//! the normalized text, first match wins within each table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use abx_core::models::mechanism::Mechanism;
use abx_core::normalize_key;

use crate::schema::ScopeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Intensity {
    Low,
    #[default]
    Standard,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResistanceSetting {
    Low,
    #[default]
    Standard,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegimenScope {
    pub intensity: Intensity,
    pub resistance: ResistanceSetting,
    pub targets: BTreeSet<Mechanism>,
    /// True when at least one field came from the condition text.
    pub inferred: bool,
}

impl RegimenScope {
    pub fn targets(&self, mechanism: Mechanism) -> bool {
        self.targets.contains(&mechanism)
    }

    /// Written for severe disease, resistant flora or carbapenem resistance.
    pub fn is_high_intensity(&self) -> bool {
        self.intensity == Intensity::High
            || self.resistance == ResistanceSetting::High
            || self.targets(Mechanism::Carbapenemase)
    }

    /// Written for mild disease or low-resistance settings, and not also
    /// high-intensity.
    pub fn is_low_intensity(&self) -> bool {
        !self.is_high_intensity()
            && (self.intensity == Intensity::Low || self.resistance == ResistanceSetting::Low)
    }
}

const INTENSITY_PHRASES: &[(&str, Intensity)] = &[
    ("non severe", Intensity::Low),
    ("not severe", Intensity::Low),
    ("mild", Intensity::Low),
    ("uncomplicated", Intensity::Low),
    ("outpatient", Intensity::Low),
    ("oral step down", Intensity::Low),
    ("severe", Intensity::High),
    ("septic shock", Intensity::High),
    ("shock", Intensity::High),
    ("sepsis", Intensity::High),
    ("critical", Intensity::High),
    ("critically ill", Intensity::High),
];

/// Local resistance-rate wording only. Phenotype words such as "resistant" or
/// "susceptible" describe the isolate and are read by [`TARGET_PHRASES`].
const RESISTANCE_PHRASES: &[(&str, ResistanceSetting)] = &[
    ("low local resistance", ResistanceSetting::Low),
    ("low resistance", ResistanceSetting::Low),
    ("high local resistance", ResistanceSetting::High),
    ("high resistance", ResistanceSetting::High),
];

const TARGET_PHRASES: &[(&str, Mechanism)] = &[
    ("esbl", Mechanism::Esbl),
    ("extended spectrum", Mechanism::Esbl),
    ("ampc", Mechanism::AmpC),
    ("carbapenemase", Mechanism::Carbapenemase),
    ("carbapenem resistant", Mechanism::Carbapenemase),
    ("cre", Mechanism::Carbapenemase),
    ("kpc", Mechanism::Carbapenemase),
    ("mrsa", Mechanism::Mrsa),
    ("methicillin resistant", Mechanism::Mrsa),
    ("vre", Mechanism::Vre),
    ("vancomycin resistant", Mechanism::Vre),
];

/// Condition text as space-separated words, padded so phrase matches respect
/// word boundaries.
fn words(text: &str) -> String {
    let body: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    format!(" {} ", normalize_key(&body, ' '))
}

fn first_match<T: Copy>(text: &str, table: &[(&str, T)]) -> Option<T> {
    table
        .iter()
        .find(|(phrase, _)| text.contains(&format!(" {phrase} ")))
        .map(|(_, value)| *value)
}

/// Build a scope from the declared fields, inferring the rest from
/// `condition`.
pub fn resolve_scope(declared: Option<&ScopeRecord>, condition: &str) -> RegimenScope {
    let text = words(condition);
    let declared = declared.cloned().unwrap_or_default();
    let mut inferred = false;

    let intensity = declared.intensity.unwrap_or_else(|| {
        inferred = true;
        first_match(&text, INTENSITY_PHRASES).unwrap_or_default()
    });
    let resistance = declared.resistance.unwrap_or_else(|| {
        inferred = true;
        first_match(&text, RESISTANCE_PHRASES).unwrap_or_default()
    });
    let targets = match declared.targets {
        Some(targets) => targets.into_iter().collect(),
        None => {
            inferred = true;
            TARGET_PHRASES
                .iter()
                .filter(|(phrase, _)| text.contains(&format!(" {phrase} ")))
                .map(|(_, mechanism)| *mechanism)
                .collect()
        }
    };

    RegimenScope {
        intensity,
        resistance,
        targets,
        inferred,
    }
}
