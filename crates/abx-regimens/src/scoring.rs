//! Named, weighted scoring rules for candidate regimens.
//!
//! A regimen's score is the sum of the weights of every rule whose predicate
//! holds. Rules are evaluated in [`RULES`] order and each hit is kept as a
//! [`RuleContribution`] so the total can be explained line by line.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use abx_core::models::assessment::{RiskLevel, SeverityLevel};
use abx_core::models::mechanism::{Mechanism, MechanismReport};

use crate::catalog::Regimen;
use crate::scope::ResistanceSetting;

/// Case-level inputs every rule sees.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub severity: SeverityLevel,
    pub mechanisms: &'a MechanismReport,
    pub risk: RiskLevel,
}

impl ScoringContext<'_> {
    /// Beta-lactamase patterns that change regimen choice. MRSA and VRE are
    /// reported but do not count here.
    fn beta_lactamase_suspected(&self) -> bool {
        [Mechanism::Esbl, Mechanism::AmpC, Mechanism::Carbapenemase]
            .into_iter()
            .any(|m| self.mechanisms.is_suspected(m))
    }
}

pub struct ScoringRule {
    pub id: &'static str,
    pub weight: i32,
    pub rationale: &'static str,
    pub applies: fn(&ScoringContext<'_>, &Regimen) -> bool,
}

impl ScoringRule {
    pub fn evaluate(&self, ctx: &ScoringContext<'_>, regimen: &Regimen) -> Option<RuleContribution> {
        (self.applies)(ctx, regimen).then(|| RuleContribution {
            rule: self.id.to_string(),
            points: self.weight,
            rationale: self.rationale.to_string(),
        })
    }
}

impl std::fmt::Debug for ScoringRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringRule")
            .field("id", &self.id)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

pub const RULES: &[ScoringRule] = &[
    ScoringRule {
        id: "primary_option",
        weight: 10,
        rationale: "first-choice regimen for this organism",
        applies: |_, r| r.primary,
    },
    ScoringRule {
        id: "severe_high_intensity",
        weight: 15,
        rationale: "severe illness and the regimen is written for high-intensity treatment",
        applies: |ctx, r| ctx.severity.is_severe_or_worse() && r.scope.is_high_intensity(),
    },
    ScoringRule {
        id: "severe_low_intensity",
        weight: -15,
        rationale: "severe illness but the regimen is scoped to mild disease or low resistance",
        applies: |ctx, r| ctx.severity.is_severe_or_worse() && r.scope.is_low_intensity(),
    },
    ScoringRule {
        id: "mild_low_intensity_no_mechanism",
        weight: 10,
        rationale: "mild illness, no beta-lactamase pattern, and the regimen is scoped to mild disease",
        applies: |ctx, r| {
            ctx.severity == SeverityLevel::Mild
                && r.scope.is_low_intensity()
                && !ctx.beta_lactamase_suspected()
        },
    },
    ScoringRule {
        id: "high_risk_high_resistance",
        weight: 12,
        rationale: "high local resistance risk and the regimen is written for resistant flora",
        applies: |ctx, r| ctx.risk == RiskLevel::High && r.scope.resistance == ResistanceSetting::High,
    },
    ScoringRule {
        id: "high_risk_low_resistance",
        weight: -10,
        rationale: "high local resistance risk but the regimen assumes low resistance",
        applies: |ctx, r| ctx.risk == RiskLevel::High && r.scope.resistance == ResistanceSetting::Low,
    },
    ScoringRule {
        id: "esbl_targeted",
        weight: 20,
        rationale: "ESBL pattern suspected and the regimen targets it",
        applies: |ctx, r| ctx.mechanisms.is_suspected(Mechanism::Esbl) && r.scope.targets(Mechanism::Esbl),
    },
    ScoringRule {
        id: "esbl_untargeted",
        weight: -25,
        rationale: "ESBL pattern suspected and the regimen does not cover it",
        applies: |ctx, r| ctx.mechanisms.is_suspected(Mechanism::Esbl) && !r.scope.targets(Mechanism::Esbl),
    },
    ScoringRule {
        id: "carbapenemase_targeted",
        weight: 25,
        rationale: "carbapenemase suspected and the regimen targets carbapenem-resistant organisms",
        applies: |ctx, r| {
            ctx.mechanisms.is_suspected(Mechanism::Carbapenemase)
                && r.scope.targets(Mechanism::Carbapenemase)
        },
    },
    ScoringRule {
        id: "carbapenemase_untargeted",
        weight: -30,
        rationale: "carbapenemase suspected and the regimen does not cover it",
        applies: |ctx, r| {
            ctx.mechanisms.is_suspected(Mechanism::Carbapenemase)
                && !r.scope.targets(Mechanism::Carbapenemase)
        },
    },
];

pub fn rule(id: &str) -> Option<&'static ScoringRule> {
    RULES.iter().find(|r| r.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RuleContribution {
    pub rule: String,
    pub points: i32,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoredRegimen {
    pub regimen_id: String,
    pub score: i32,
    pub contributions: Vec<RuleContribution>,
}

pub fn score_regimen(regimen: &Regimen, ctx: &ScoringContext<'_>) -> ScoredRegimen {
    let contributions: Vec<RuleContribution> = RULES
        .iter()
        .filter_map(|rule| rule.evaluate(ctx, regimen))
        .collect();
    ScoredRegimen {
        regimen_id: regimen.id.clone(),
        score: contributions.iter().map(|c| c.points).sum(),
        contributions,
    }
}

/// Score every regimen, highest first. Ties keep knowledge-base order.
pub fn score_regimens(regimens: &[Regimen], ctx: &ScoringContext<'_>) -> Vec<ScoredRegimen> {
    let mut scored: Vec<ScoredRegimen> = regimens.iter().map(|r| score_regimen(r, ctx)).collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
