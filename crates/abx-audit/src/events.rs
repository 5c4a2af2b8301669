use serde::Serialize;

use abx_core::models::antibiotic::Antibiotic;
use abx_core::models::mechanism::Mechanism;
use abx_core::models::organism::OrganismCategory;

/// A structured event raised while processing one request.
///
/// Events marked as degraded (see [`EngineEvent::is_degraded`]) correspond to
/// fallback or low-confidence paths in the result they accompany.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Organism matched a genus fragment rather than an exact identifier.
    OrganismPatternMatch {
        identifier: String,
        fragment: String,
        category: OrganismCategory,
    },
    /// Organism could not be mapped and fell back to the generic category.
    OrganismFallback { identifier: String },
    UnknownAntibiotic { name: String },
    BreakpointsMissing {
        category: OrganismCategory,
        antibiotic: Antibiotic,
    },
    IntrinsicResistance {
        category: OrganismCategory,
        antibiotic: Antibiotic,
    },
    UnparseableValue { antibiotic: String, raw: String },
    /// An earlier panel entry was replaced by a later one for the same drug.
    DuplicateResult { antibiotic: String, value: String },
    MechanismSuspected {
        mechanism: Mechanism,
        confidence: f64,
    },
    UnrecognizedAllergy { label: String },
    /// A higher-scoring regimen had no usable drug and was skipped.
    RegimenFallback { regimen_id: String, score: i32 },
    RegimenSelected {
        regimen_id: String,
        antibiotic: Antibiotic,
        score: i32,
    },
    NoSuitableOption {
        organism: String,
        regimens_evaluated: usize,
    },
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OrganismPatternMatch { .. } => "organism_pattern_match",
            Self::OrganismFallback { .. } => "organism_fallback",
            Self::UnknownAntibiotic { .. } => "unknown_antibiotic",
            Self::BreakpointsMissing { .. } => "breakpoints_missing",
            Self::IntrinsicResistance { .. } => "intrinsic_resistance",
            Self::UnparseableValue { .. } => "unparseable_value",
            Self::DuplicateResult { .. } => "duplicate_result",
            Self::MechanismSuspected { .. } => "mechanism_suspected",
            Self::UnrecognizedAllergy { .. } => "unrecognized_allergy",
            Self::RegimenFallback { .. } => "regimen_fallback",
            Self::RegimenSelected { .. } => "regimen_selected",
            Self::NoSuitableOption { .. } => "no_suitable_option",
        }
    }

    /// True for events that mark a fallback or reduced-confidence path.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            Self::OrganismFallback { .. }
                | Self::UnknownAntibiotic { .. }
                | Self::BreakpointsMissing { .. }
                | Self::UnparseableValue { .. }
                | Self::DuplicateResult { .. }
                | Self::UnrecognizedAllergy { .. }
                | Self::RegimenFallback { .. }
                | Self::NoSuitableOption { .. }
        )
    }

    /// Event payload as JSON, for sinks that forward structured details.
    pub fn details(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
