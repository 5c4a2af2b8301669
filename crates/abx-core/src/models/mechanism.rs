use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::antibiotic::Antibiotic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Mechanism {
    /// Extended-spectrum beta-lactamase.
    Esbl,
    /// Inducible chromosomal (AmpC) beta-lactamase.
    AmpC,
    Carbapenemase,
    /// Methicillin-resistant Staphylococcus aureus.
    Mrsa,
    /// Vancomycin-resistant Enterococcus.
    Vre,
}

impl Mechanism {
    pub fn label(self) -> &'static str {
        match self {
            Self::Esbl => "extended-spectrum beta-lactamase",
            Self::AmpC => "inducible AmpC beta-lactamase",
            Self::Carbapenemase => "carbapenemase",
            Self::Mrsa => "methicillin resistance (MRSA)",
            Self::Vre => "vancomycin resistance (VRE)",
        }
    }
}

/// A derived resistance-phenotype finding for one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MechanismFinding {
    pub mechanism: Mechanism,
    pub suspected: bool,
    /// 0.0–1.0. Binary patterns report 0 or 1.
    pub confidence: f64,
    /// The results that matched the pattern.
    pub supporting: Vec<Antibiotic>,
    pub pattern: String,
    pub implication: String,
}

impl MechanismFinding {
    pub fn not_suspected(mechanism: Mechanism, pattern: impl Into<String>) -> Self {
        Self {
            mechanism,
            suspected: false,
            confidence: 0.0,
            supporting: Vec::new(),
            pattern: pattern.into(),
            implication: String::new(),
        }
    }
}

/// All mechanism findings for one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MechanismReport {
    pub esbl: MechanismFinding,
    pub amp_c: MechanismFinding,
    pub carbapenemase: MechanismFinding,
    pub mrsa: MechanismFinding,
    pub vre: MechanismFinding,
    pub summary: String,
}

impl MechanismReport {
    pub fn findings(&self) -> [&MechanismFinding; 5] {
        [&self.esbl, &self.amp_c, &self.carbapenemase, &self.mrsa, &self.vre]
    }

    pub fn is_suspected(&self, mechanism: Mechanism) -> bool {
        self.findings()
            .iter()
            .any(|f| f.mechanism == mechanism && f.suspected)
    }

    pub fn any_suspected(&self) -> bool {
        self.findings().iter().any(|f| f.suspected)
    }

    pub fn suspected(&self) -> Vec<Mechanism> {
        self.findings()
            .iter()
            .filter(|f| f.suspected)
            .map(|f| f.mechanism)
            .collect()
    }
}
