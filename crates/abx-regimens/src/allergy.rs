//! Allergy labels → drugs to exclude.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use abx_core::models::antibiotic::{Antibiotic, DrugClass};
use abx_core::normalize_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum AllergyTarget {
    Antibiotic(Antibiotic),
    Class(DrugClass),
    /// Penicillins, cephalosporins and carbapenems.
    BetaLactams,
}

impl AllergyTarget {
    pub fn covers(self, antibiotic: Antibiotic) -> bool {
        match self {
            Self::Antibiotic(a) => a == antibiotic,
            Self::Class(class) => antibiotic.class() == class,
            Self::BetaLactams => antibiotic.class().is_beta_lactam(),
        }
    }
}

impl fmt::Display for AllergyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Antibiotic(a) => write!(f, "{a}"),
            Self::Class(class) => write!(f, "{} class", class.label()),
            Self::BetaLactams => f.write_str("beta-lactams"),
        }
    }
}

const BETA_LACTAM_LABELS: &[&str] = &["beta_lactam", "beta_lactams", "betalactam", "betalactams", "b_lactam"];

/// Brand and single-agent names that imply a whole class on an allergy list.
const CLASS_ALIASES: &[(&str, DrugClass)] = &[
    ("pcn", DrugClass::Penicillin),
    ("amoxicillin", DrugClass::Penicillin),
    ("amoxil", DrugClass::Penicillin),
    ("nafcillin", DrugClass::Penicillin),
    ("dicloxacillin", DrugClass::Penicillin),
    ("piperacillin", DrugClass::Penicillin),
    ("cephalexin", DrugClass::Cephalosporin),
    ("keflex", DrugClass::Cephalosporin),
    ("cefadroxil", DrugClass::Cephalosporin),
    ("cefdinir", DrugClass::Cephalosporin),
    ("bactrim", DrugClass::FolatePathwayInhibitor),
    ("septra", DrugClass::FolatePathwayInhibitor),
];

/// Resolved allergy list for one case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AllergyProfile {
    pub targets: Vec<AllergyTarget>,
    /// Labels that matched nothing. Reported back, never silently dropped.
    pub unrecognized: Vec<String>,
}

impl AllergyProfile {
    /// Resolve each label as the beta-lactam family, then a drug class, then a
    /// single antibiotic.
    pub fn resolve<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut profile = Self::default();
        for label in labels {
            let label = label.as_ref();
            if label.trim().is_empty() {
                continue;
            }
            match resolve_label(label) {
                Some(target) if !profile.targets.contains(&target) => profile.targets.push(target),
                Some(_) => {}
                None => profile.unrecognized.push(label.to_string()),
            }
        }
        profile
    }

    /// The first target that rules out `antibiotic`.
    pub fn excluding(&self, antibiotic: Antibiotic) -> Option<AllergyTarget> {
        self.targets.iter().copied().find(|t| t.covers(antibiotic))
    }

    pub fn excludes(&self, antibiotic: Antibiotic) -> bool {
        self.excluding(antibiotic).is_some()
    }
}

pub fn resolve_label(label: &str) -> Option<AllergyTarget> {
    let key = normalize_key(label, '_');
    let key = key
        .strip_suffix("_allergy")
        .or_else(|| key.strip_suffix("_allergic"))
        .unwrap_or(&key);

    if BETA_LACTAM_LABELS.contains(&key) {
        return Some(AllergyTarget::BetaLactams);
    }
    if let Some(class) = DrugClass::from_label(key) {
        return Some(AllergyTarget::Class(class));
    }
    if let Some((_, class)) = CLASS_ALIASES.iter().find(|(alias, _)| *alias == key) {
        return Some(AllergyTarget::Class(*class));
    }
    Antibiotic::resolve(key).map(AllergyTarget::Antibiotic)
}
