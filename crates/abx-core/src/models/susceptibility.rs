use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::antibiotic::Antibiotic;
use crate::normalize_key;

/// Interpretive category for one organism/antibiotic pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SusceptibilityCall {
    #[serde(rename = "S")]
    Susceptible,
    #[serde(rename = "I")]
    Intermediate,
    #[serde(rename = "R")]
    Resistant,
    /// Susceptible-dose-dependent.
    #[serde(rename = "SDD")]
    SusceptibleDoseDependent,
    /// No interpretation possible (no breakpoints, unknown drug).
    #[serde(rename = "NA")]
    NotApplicable,
}

impl SusceptibilityCall {
    pub fn code(self) -> &'static str {
        match self {
            Self::Susceptible => "S",
            Self::Intermediate => "I",
            Self::Resistant => "R",
            Self::SusceptibleDoseDependent => "SDD",
            Self::NotApplicable => "NA",
        }
    }

    /// Parse a pre-assigned category as reported by a laboratory.
    pub fn from_reported(raw: &str) -> Option<Self> {
        let call = match normalize_key(raw, '_').as_str() {
            "s" | "susceptible" | "sensitive" => Self::Susceptible,
            "i" | "intermediate" => Self::Intermediate,
            "r" | "resistant" => Self::Resistant,
            "sdd" | "susceptible_dose_dependent" => Self::SusceptibleDoseDependent,
            "na" | "n_a" | "not_applicable" => Self::NotApplicable,
            _ => return None,
        };
        Some(call)
    }
}

impl fmt::Display for SusceptibilityCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The per-case map of antibiotic to interpretive call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SusceptibilityProfile(BTreeMap<Antibiotic, SusceptibilityCall>);

impl SusceptibilityProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from free-form `(antibiotic, call)` pairs, returning
    /// the names that did not resolve alongside it.
    pub fn from_named<'a, I>(entries: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (&'a str, SusceptibilityCall)>,
    {
        let mut profile = Self::new();
        let mut unresolved = Vec::new();
        for (name, call) in entries {
            match Antibiotic::resolve(name) {
                Some(antibiotic) => profile.insert(antibiotic, call),
                None => unresolved.push(name.to_string()),
            }
        }
        (profile, unresolved)
    }

    pub fn insert(&mut self, antibiotic: Antibiotic, call: SusceptibilityCall) {
        self.0.insert(antibiotic, call);
    }

    pub fn with(mut self, antibiotic: Antibiotic, call: SusceptibilityCall) -> Self {
        self.insert(antibiotic, call);
        self
    }

    pub fn get(&self, antibiotic: Antibiotic) -> Option<SusceptibilityCall> {
        self.0.get(&antibiotic).copied()
    }

    pub fn is(&self, antibiotic: Antibiotic, call: SusceptibilityCall) -> bool {
        self.get(antibiotic) == Some(call)
    }

    pub fn is_resistant(&self, antibiotic: Antibiotic) -> bool {
        self.is(antibiotic, SusceptibilityCall::Resistant)
    }

    pub fn is_susceptible(&self, antibiotic: Antibiotic) -> bool {
        self.is(antibiotic, SusceptibilityCall::Susceptible)
    }

    /// How many of `panel` carry the given call.
    pub fn count(&self, panel: &[Antibiotic], call: SusceptibilityCall) -> usize {
        panel.iter().filter(|a| self.is(**a, call)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Antibiotic, SusceptibilityCall)> + '_ {
        self.0.iter().map(|(a, c)| (*a, *c))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
