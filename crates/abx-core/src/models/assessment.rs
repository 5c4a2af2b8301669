use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::case::InstitutionType;

/// How far a derived result can be trusted. Anything below `High` marks a
/// fallback or ambiguous path that callers must surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Confidence {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityLevel {
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl SeverityLevel {
    /// Bucket an additive severity score: ≤2 mild, 3–5 moderate, 6–8 severe,
    /// above 8 critical.
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=2 => Self::Mild,
            3..=5 => Self::Moderate,
            6..=8 => Self::Severe,
            _ => Self::Critical,
        }
    }

    pub fn is_severe_or_worse(self) -> bool {
        self >= Self::Severe
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mild => "MILD",
            Self::Moderate => "MODERATE",
            Self::Severe => "SEVERE",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of an itemized score: what contributed and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreFactor {
    pub label: String,
    pub points: i32,
}

impl ScoreFactor {
    pub fn new(label: impl Into<String>, points: i32) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}

impl fmt::Display for ScoreFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:+}", self.label, self.points)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityAssessment {
    pub score: i32,
    pub level: SeverityLevel,
    pub factors: Vec<ScoreFactor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        })
    }
}

/// Where a resistance-rate figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RateSource {
    LocalOverride,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EpidemiologyContext {
    pub genus: String,
    pub esbl_rate: f64,
    pub esbl_rate_source: RateSource,
    pub carbapenem_resistance_rate: f64,
    pub carbapenem_resistance_rate_source: RateSource,
    pub institution_type: InstitutionType,
    pub risk_score: i32,
    pub risk: RiskLevel,
    pub factors: Vec<ScoreFactor>,
}
