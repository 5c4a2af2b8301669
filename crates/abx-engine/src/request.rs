use serde::{Deserialize, Serialize};
use ts_rs::TS;

use abx_core::models::case::CaseContext;

/// How a raw susceptibility value was measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResultMethod {
    /// MIC in mg/L, or a category reported by the laboratory.
    #[default]
    Mic,
    /// Disk-diffusion zone diameter in mm.
    Disk,
}

/// One line of a laboratory panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SusceptibilityInput {
    pub antibiotic: String,
    /// `"≤0.5"`, `"4/76"`, `"2-4"`, `"S"`, ...
    pub value: String,
    #[serde(default)]
    pub method: ResultMethod,
}

impl SusceptibilityInput {
    pub fn mic(antibiotic: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            antibiotic: antibiotic.into(),
            value: value.into(),
            method: ResultMethod::Mic,
        }
    }

    pub fn disk(antibiotic: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            antibiotic: antibiotic.into(),
            value: value.into(),
            method: ResultMethod::Disk,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CaseRequest {
    pub organism: String,
    #[serde(default)]
    pub results: Vec<SusceptibilityInput>,
    #[serde(default)]
    pub case: CaseContext,
}

impl CaseRequest {
    pub fn new(organism: impl Into<String>) -> Self {
        Self {
            organism: organism.into(),
            ..Default::default()
        }
    }

    pub fn result(mut self, input: SusceptibilityInput) -> Self {
        self.results.push(input);
        self
    }

    pub fn mic(self, antibiotic: &str, value: &str) -> Self {
        self.result(SusceptibilityInput::mic(antibiotic, value))
    }

    pub fn with_case(mut self, case: CaseContext) -> Self {
        self.case = case;
        self
    }
}
