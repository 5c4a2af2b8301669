use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use abx_breakpoints::classifier::Classification;
use abx_breakpoints::comparator::{Interpretation, InterpretationReason};
use abx_core::models::assessment::{EpidemiologyContext, SeverityAssessment};
use abx_core::models::mechanism::MechanismReport;
use abx_core::models::susceptibility::SusceptibilityProfile;
use abx_regimens::allergy::AllergyProfile;
use abx_regimens::selection::Selection;

/// Versions of the knowledge bases a report was produced against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KnowledgeBaseVersions {
    pub breakpoints: String,
    pub regimens: String,
}

/// A panel result left out of the susceptibility profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExcludedResult {
    pub antibiotic: String,
    pub value: String,
    pub reason: InterpretationReason,
    /// Replaced by a later entry for the same antibiotic.
    #[serde(default)]
    pub superseded: bool,
}

/// Everything the engine derived for one case, in pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CaseReport {
    pub request_id: Uuid,
    pub generated_at: jiff::Timestamp,
    pub knowledge_base: KnowledgeBaseVersions,
    pub classification: Classification,
    pub interpretations: Vec<Interpretation>,
    pub profile: SusceptibilityProfile,
    pub excluded_results: Vec<ExcludedResult>,
    pub mechanisms: MechanismReport,
    pub severity: SeverityAssessment,
    pub epidemiology: EpidemiologyContext,
    pub allergies: AllergyProfile,
    /// Regimen knowledge-base key the candidates came from, if any.
    pub regimen_source: Option<String>,
    pub selection: Selection,
}

impl CaseReport {
    pub fn interpretation(&self, antibiotic_input: &str) -> Option<&Interpretation> {
        self.interpretations
            .iter()
            .find(|i| i.antibiotic_input == antibiotic_input)
    }
}
