//! Regimen selection: score the candidates, then walk them best first until
//! one leaves at least one usable drug.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use abx_core::models::antibiotic::Antibiotic;
use abx_core::models::assessment::{EpidemiologyContext, SeverityAssessment};
use abx_core::models::case::InfectionSite;
use abx_core::models::mechanism::MechanismReport;
use abx_core::models::susceptibility::{SusceptibilityCall, SusceptibilityProfile};

use crate::allergy::{AllergyProfile, AllergyTarget};
use crate::catalog::{DrugOption, Preference, Regimen};
use crate::penetration::{Penetration, penetration};
use crate::scoring::{ScoredRegimen, ScoringContext, score_regimens};

pub const NO_SUITABLE_OPTION: &str = "No suitable option; specialist consultation recommended";

pub struct SelectionInput<'a> {
    pub regimens: &'a [Regimen],
    pub severity: &'a SeverityAssessment,
    pub mechanisms: &'a MechanismReport,
    pub epidemiology: &'a EpidemiologyContext,
    pub profile: &'a SusceptibilityProfile,
    pub allergies: &'a AllergyProfile,
    pub site: InfectionSite,
}

/// A usable drug from the chosen regimen, with its site penetration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RankedOption {
    pub antibiotic: Antibiotic,
    pub dose: String,
    pub route: String,
    pub frequency: String,
    pub preference: Preference,
    pub notes: Option<String>,
    pub penetration: Penetration,
}

impl RankedOption {
    fn new(option: &DrugOption, site: InfectionSite) -> Self {
        Self {
            antibiotic: option.antibiotic,
            dose: option.dose.clone(),
            route: option.route.clone(),
            frequency: option.frequency.clone(),
            preference: option.preference,
            notes: option.notes.clone(),
            penetration: penetration(site, option.antibiotic),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[ts(export)]
pub enum ExclusionReason {
    Allergy { target: AllergyTarget },
    NotTested,
    NotSusceptible { call: SusceptibilityCall },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExcludedOption {
    pub antibiotic: Antibiotic,
    pub reason: ExclusionReason,
}

/// A higher-scoring regimen passed over because none of its drugs were usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkippedRegimen {
    pub regimen_id: String,
    pub score: i32,
    pub excluded: Vec<ExcludedOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Recommendation {
    pub regimen_id: String,
    pub regimen_name: String,
    pub condition: String,
    pub population: Option<String>,
    pub infection_source: Option<String>,
    pub score: i32,
    pub chosen: RankedOption,
    pub alternatives: Vec<RankedOption>,
    /// Options of the chosen regimen that were filtered out.
    pub excluded: Vec<ExcludedOption>,
    pub rationale: Vec<String>,
    pub skipped: Vec<SkippedRegimen>,
    pub scores: Vec<ScoredRegimen>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export)]
pub enum Selection {
    Recommended(Recommendation),
    NoSuitableOption {
        message: String,
        scores: Vec<ScoredRegimen>,
        skipped: Vec<SkippedRegimen>,
    },
}

impl Selection {
    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Self::Recommended(rec) => Some(rec),
            Self::NoSuitableOption { .. } => None,
        }
    }

    pub fn is_recommended(&self) -> bool {
        self.recommendation().is_some()
    }

    pub fn scores(&self) -> &[ScoredRegimen] {
        match self {
            Self::Recommended(rec) => &rec.scores,
            Self::NoSuitableOption { scores, .. } => scores,
        }
    }
}

fn exclusion(
    option: &DrugOption,
    profile: &SusceptibilityProfile,
    allergies: &AllergyProfile,
) -> Option<ExclusionReason> {
    if let Some(target) = allergies.excluding(option.antibiotic) {
        return Some(ExclusionReason::Allergy { target });
    }
    match profile.get(option.antibiotic) {
        Some(SusceptibilityCall::Susceptible) => None,
        Some(call) => Some(ExclusionReason::NotSusceptible { call }),
        None => Some(ExclusionReason::NotTested),
    }
}

/// Split a regimen's options into usable drugs, ranked by site penetration
/// then declared preference, and excluded ones.
pub fn rank_options(
    regimen: &Regimen,
    profile: &SusceptibilityProfile,
    allergies: &AllergyProfile,
    site: InfectionSite,
) -> (Vec<RankedOption>, Vec<ExcludedOption>) {
    let mut usable = Vec::new();
    let mut excluded = Vec::new();
    for option in &regimen.options {
        match exclusion(option, profile, allergies) {
            Some(reason) => excluded.push(ExcludedOption {
                antibiotic: option.antibiotic,
                reason,
            }),
            None => usable.push(RankedOption::new(option, site)),
        }
    }
    usable.sort_by_key(|o| (o.penetration, o.preference));
    (usable, excluded)
}

fn rationale(
    regimen: &Regimen,
    scored: &ScoredRegimen,
    chosen: &RankedOption,
    input: &SelectionInput<'_>,
    skipped: &[SkippedRegimen],
) -> Vec<String> {
    let mut lines = vec![format!(
        "Severity {} (score {}); local resistance risk {}.",
        input.severity.level, input.severity.score, input.epidemiology.risk
    )];
    lines.push(input.mechanisms.summary.clone());
    lines.push(format!(
        "Selected '{}' ({}) with score {}.",
        regimen.name, regimen.condition, scored.score
    ));
    lines.extend(
        scored
            .contributions
            .iter()
            .map(|c| format!("{:+} {}", c.points, c.rationale)),
    );
    for skip in skipped {
        lines.push(format!(
            "Regimen '{}' (score {}) skipped: no susceptible, non-allergenic drug.",
            skip.regimen_id, skip.score
        ));
    }
    lines.push(format!(
        "{} is susceptible with {} penetration at the {} site.",
        chosen.antibiotic, chosen.penetration, input.site
    ));
    for target in &input.allergies.targets {
        lines.push(format!("Allergy considered: {target}."));
    }
    lines
}

pub fn select_regimen(input: &SelectionInput<'_>) -> Selection {
    let ctx = ScoringContext {
        severity: input.severity.level,
        mechanisms: input.mechanisms,
        risk: input.epidemiology.risk,
    };
    let scores = score_regimens(input.regimens, &ctx);
    let mut skipped = Vec::new();

    for scored in &scores {
        let Some(regimen) = input.regimens.iter().find(|r| r.id == scored.regimen_id) else {
            continue;
        };
        let (mut usable, excluded) = rank_options(regimen, input.profile, input.allergies, input.site);
        if usable.is_empty() {
            skipped.push(SkippedRegimen {
                regimen_id: regimen.id.clone(),
                score: scored.score,
                excluded,
            });
            continue;
        }

        let chosen = usable.remove(0);
        let rationale = rationale(regimen, scored, &chosen, input, &skipped);
        return Selection::Recommended(Recommendation {
            regimen_id: regimen.id.clone(),
            regimen_name: regimen.name.clone(),
            condition: regimen.condition.clone(),
            population: regimen.population.clone(),
            infection_source: regimen.infection_source.clone(),
            score: scored.score,
            chosen,
            alternatives: usable,
            excluded,
            rationale,
            skipped,
            scores,
        });
    }

    Selection::NoSuitableOption {
        message: NO_SUITABLE_OPTION.to_string(),
        scores,
        skipped,
    }
}
