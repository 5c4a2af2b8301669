//! On-disk shape of the treatment regimen knowledge base.

use serde::{Deserialize, Serialize};

use abx_core::models::mechanism::Mechanism;

use crate::scope::{Intensity, ResistanceSetting};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimenDocument {
    pub version: String,
    pub published: jiff::civil::Date,
    pub regimens: Vec<RegimenRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimenRecord {
    pub id: String,
    /// Organism identifier (`escherichia_coli`) or category key
    /// (`enterobacterales`).
    pub organism: String,
    pub name: String,
    /// Clinical applicability, shown to the user and used to infer the scope
    /// when `scope` is absent.
    pub condition: String,
    /// Patients the regimen is written for (`"Adults"`, `"Non-pregnant
    /// adults, community onset"`).
    #[serde(default)]
    pub population: Option<String>,
    /// Where the infection is expected to originate.
    #[serde(default)]
    pub infection_source: Option<String>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub scope: Option<ScopeRecord>,
    /// Treatment steps in order. The first entry is the first-line step.
    pub options: Vec<DrugOptionRecord>,
}

/// Explicit scope. Any field left out is inferred from the condition text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeRecord {
    #[serde(default)]
    pub intensity: Option<Intensity>,
    #[serde(default)]
    pub resistance: Option<ResistanceSetting>,
    #[serde(default)]
    pub targets: Option<Vec<Mechanism>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugOptionRecord {
    pub antibiotic: String,
    pub dose: String,
    pub route: String,
    pub frequency: String,
    #[serde(default)]
    pub preference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
