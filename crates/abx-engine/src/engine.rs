use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use abx_audit::{EngineEvent, Telemetry, TracingTelemetry};
use abx_breakpoints::catalog::BreakpointCatalog;
use abx_breakpoints::classifier::{Classification, MatchMethod, classify};
use abx_breakpoints::comparator::{Interpretation, InterpretationReason, interpret, interpret_zone};
use abx_core::models::antibiotic::Antibiotic;
use abx_core::models::assessment::{EpidemiologyContext, SeverityAssessment};
use abx_core::models::case::{CaseContext, InfectionSite, LocalResistanceRates};
use abx_core::models::mechanism::MechanismReport;
use abx_core::models::susceptibility::{SusceptibilityCall, SusceptibilityProfile};
use abx_regimens::allergy::AllergyProfile;
use abx_regimens::catalog::RegimenCatalog;
use abx_regimens::epidemiology::{ResistanceDefaults, assess_epidemiology};
use abx_regimens::mechanisms::detect;
use abx_regimens::selection::{Selection, SelectionInput, select_regimen};
use abx_regimens::severity::assess_severity;

use crate::error::EngineError;
use crate::report::{CaseReport, ExcludedResult, KnowledgeBaseVersions};
use crate::request::{CaseRequest, ResultMethod, SusceptibilityInput};

/// The decision engine. Cheap to clone; every operation takes `&self` and
/// shares nothing mutable between calls.
#[derive(Clone)]
pub struct Engine {
    breakpoints: Arc<BreakpointCatalog>,
    regimens: Arc<RegimenCatalog>,
    telemetry: Arc<dyn Telemetry>,
    defaults: ResistanceDefaults,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("breakpoints", &self.breakpoints.version)
            .field("regimens", &self.regimens.version)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(breakpoints: Arc<BreakpointCatalog>, regimens: Arc<RegimenCatalog>) -> Self {
        Self {
            breakpoints,
            regimens,
            telemetry: Arc::new(TracingTelemetry),
            defaults: ResistanceDefaults::default(),
        }
    }

    /// Engine over the knowledge bases compiled into the binary.
    pub fn embedded() -> Result<Self, EngineError> {
        Ok(Self::new(
            BreakpointCatalog::embedded()?,
            RegimenCatalog::embedded()?,
        ))
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn with_default_rates(mut self, defaults: ResistanceDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn breakpoints(&self) -> &BreakpointCatalog {
        &self.breakpoints
    }

    pub fn regimens(&self) -> &RegimenCatalog {
        &self.regimens
    }

    pub fn knowledge_base(&self) -> KnowledgeBaseVersions {
        KnowledgeBaseVersions {
            breakpoints: self.breakpoints.version.clone(),
            regimens: self.regimens.version.clone(),
        }
    }

    fn emit(&self, event: EngineEvent) {
        self.telemetry.record(&event);
    }

    pub fn classify(&self, organism: &str) -> Classification {
        let classification = classify(&self.breakpoints, organism);
        match classification.method {
            MatchMethod::Exact => {}
            MatchMethod::Pattern => self.emit(EngineEvent::OrganismPatternMatch {
                identifier: organism.to_string(),
                fragment: classification.matched_fragment.clone().unwrap_or_default(),
                category: classification.category,
            }),
            MatchMethod::Fallback => self.emit(EngineEvent::OrganismFallback {
                identifier: organism.to_string(),
            }),
        }
        classification
    }

    /// Interpret a MIC or reported category for an organism.
    pub fn interpret(
        &self,
        organism: &str,
        antibiotic: &str,
        raw: &str,
        site: Option<InfectionSite>,
    ) -> Interpretation {
        let classification = self.classify(organism);
        self.interpret_for(&classification, &SusceptibilityInput::mic(antibiotic, raw), site)
    }

    /// Interpret a disk-diffusion zone diameter for an organism.
    pub fn interpret_zone(
        &self,
        organism: &str,
        antibiotic: &str,
        raw: &str,
        site: Option<InfectionSite>,
    ) -> Interpretation {
        let classification = self.classify(organism);
        self.interpret_for(&classification, &SusceptibilityInput::disk(antibiotic, raw), site)
    }

    pub fn interpret_for(
        &self,
        classification: &Classification,
        input: &SusceptibilityInput,
        site: Option<InfectionSite>,
    ) -> Interpretation {
        let interpretation = match input.method {
            ResultMethod::Mic => interpret(
                &self.breakpoints,
                classification,
                &input.antibiotic,
                &input.value,
                site,
            ),
            ResultMethod::Disk => interpret_zone(
                &self.breakpoints,
                classification,
                &input.antibiotic,
                &input.value,
                site,
            ),
        };
        self.report_interpretation(&interpretation);
        interpretation
    }

    fn report_interpretation(&self, interpretation: &Interpretation) {
        let event = match (interpretation.reason, interpretation.antibiotic) {
            (InterpretationReason::UnknownAntibiotic, _) => EngineEvent::UnknownAntibiotic {
                name: interpretation.antibiotic_input.clone(),
            },
            (InterpretationReason::NoBreakpoints, Some(antibiotic)) => {
                EngineEvent::BreakpointsMissing {
                    category: interpretation.category,
                    antibiotic,
                }
            }
            (InterpretationReason::IntrinsicResistance, Some(antibiotic)) => {
                EngineEvent::IntrinsicResistance {
                    category: interpretation.category,
                    antibiotic,
                }
            }
            (InterpretationReason::UnparseableValue, _) => EngineEvent::UnparseableValue {
                antibiotic: interpretation.antibiotic_input.clone(),
                raw: interpretation.input_value.clone(),
            },
            _ => return,
        };
        self.emit(event);
    }

    pub fn detect_mechanisms(
        &self,
        profile: &SusceptibilityProfile,
        classification: &Classification,
    ) -> MechanismReport {
        let report = detect(profile, classification);
        for finding in report.findings().into_iter().filter(|f| f.suspected) {
            self.emit(EngineEvent::MechanismSuspected {
                mechanism: finding.mechanism,
                confidence: finding.confidence,
            });
        }
        report
    }

    pub fn assess_severity(&self, case: &CaseContext) -> SeverityAssessment {
        assess_severity(case)
    }

    pub fn assess_epidemiology(
        &self,
        genus: &str,
        local: Option<&LocalResistanceRates>,
    ) -> Result<EpidemiologyContext, EngineError> {
        Ok(assess_epidemiology(genus, local, &self.defaults)?)
    }

    /// Run the whole pipeline for one case.
    #[instrument(skip_all, fields(organism = %request.organism, results = request.results.len()))]
    pub fn recommend(&self, request: &CaseRequest) -> Result<CaseReport, EngineError> {
        let case = &request.case;
        let site = case.syndrome.site();
        let classification = self.classify(&request.organism);

        let interpretations: Vec<Interpretation> = request
            .results
            .iter()
            .map(|input| self.interpret_for(&classification, input, Some(site)))
            .collect();
        let (profile, excluded_results) = build_profile(&interpretations);
        debug!(
            tested = profile.len(),
            excluded = excluded_results.len(),
            "susceptibility profile built"
        );
        for duplicate in excluded_results.iter().filter(|e| e.superseded) {
            self.emit(EngineEvent::DuplicateResult {
                antibiotic: duplicate.antibiotic.clone(),
                value: duplicate.value.clone(),
            });
        }

        let mechanisms = self.detect_mechanisms(&profile, &classification);
        let severity = self.assess_severity(case);
        let genus = classification.genus.as_deref().unwrap_or_default();
        let epidemiology = self.assess_epidemiology(genus, case.local_rates.as_ref())?;

        let allergies = AllergyProfile::resolve(&case.allergies);
        for label in &allergies.unrecognized {
            self.emit(EngineEvent::UnrecognizedAllergy {
                label: label.clone(),
            });
        }

        let candidates = self.regimens.candidates(&classification);
        let selection = select_regimen(&SelectionInput {
            regimens: candidates.map(|c| c.regimens).unwrap_or_default(),
            severity: &severity,
            mechanisms: &mechanisms,
            epidemiology: &epidemiology,
            profile: &profile,
            allergies: &allergies,
            site,
        });
        self.report_selection(&selection, classification.organism_key());

        Ok(CaseReport {
            request_id: uuid::Uuid::new_v4(),
            generated_at: jiff::Timestamp::now(),
            knowledge_base: self.knowledge_base(),
            regimen_source: candidates.map(|c| c.matched_key.to_string()),
            classification,
            interpretations,
            profile,
            excluded_results,
            mechanisms,
            severity,
            epidemiology,
            allergies,
            selection,
        })
    }

    fn report_selection(&self, selection: &Selection, organism: &str) {
        let skipped = match selection {
            Selection::Recommended(rec) => &rec.skipped,
            Selection::NoSuitableOption { skipped, .. } => skipped,
        };
        for skip in skipped {
            self.emit(EngineEvent::RegimenFallback {
                regimen_id: skip.regimen_id.clone(),
                score: skip.score,
            });
        }
        match selection {
            Selection::Recommended(rec) => self.emit(EngineEvent::RegimenSelected {
                regimen_id: rec.regimen_id.clone(),
                antibiotic: rec.chosen.antibiotic,
                score: rec.score,
            }),
            Selection::NoSuitableOption { scores, .. } => {
                self.emit(EngineEvent::NoSuitableOption {
                    organism: organism.to_string(),
                    regimens_evaluated: scores.len(),
                })
            }
        }
    }
}

/// Usable calls go into the profile; unknown drugs, NA calls and unreadable
/// values are listed separately. When an antibiotic appears more than once,
/// the last usable entry is kept and the earlier one is listed as superseded.
fn build_profile(interpretations: &[Interpretation]) -> (SusceptibilityProfile, Vec<ExcludedResult>) {
    let mut profile = SusceptibilityProfile::new();
    let mut kept: HashMap<Antibiotic, &Interpretation> = HashMap::new();
    let mut excluded = Vec::new();
    for interpretation in interpretations {
        match interpretation.antibiotic {
            Some(antibiotic)
                if interpretation.call != SusceptibilityCall::NotApplicable
                    && interpretation.reason != InterpretationReason::UnparseableValue =>
            {
                profile.insert(antibiotic, interpretation.call);
                if let Some(earlier) = kept.insert(antibiotic, interpretation) {
                    excluded.push(excluded_result(earlier, true));
                }
            }
            _ => excluded.push(excluded_result(interpretation, false)),
        }
    }
    (profile, excluded)
}

fn excluded_result(interpretation: &Interpretation, superseded: bool) -> ExcludedResult {
    ExcludedResult {
        antibiotic: interpretation.antibiotic_input.clone(),
        value: interpretation.input_value.clone(),
        reason: interpretation.reason,
        superseded,
    }
}
