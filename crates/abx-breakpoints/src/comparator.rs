//! MIC and zone-diameter interpretation against a [`BreakpointCatalog`].
//!
//! Every path returns an [`Interpretation`]; nothing here fails. Degraded
//! paths (unknown antibiotic, missing breakpoints, unreadable value) are
//! marked through [`InterpretationReason`] and a confidence below `High`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use abx_core::models::antibiotic::Antibiotic;
use abx_core::models::assessment::Confidence;
use abx_core::models::case::InfectionSite;
use abx_core::models::organism::OrganismCategory;
use abx_core::models::susceptibility::SusceptibilityCall;

use crate::catalog::{Boundary, BreakpointCatalog, BreakpointSet, ResolvedBreakpoints};
use crate::classifier::Classification;
use crate::measurement::{ComparisonOp, EPSILON, Measurement, parse_measurement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InterpretationReason {
    /// The value met a declared S, SDD, I or R boundary.
    Breakpoint,
    /// Between S and R with no declared range covering it.
    BetweenBoundaries,
    /// Above the only declared (susceptible) boundary.
    NonSusceptible,
    IntrinsicResistance,
    NoBreakpoints,
    UnknownAntibiotic,
    /// A category supplied by the laboratory, taken as-is.
    Reported,
    UnparseableValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TestMethod {
    Mic,
    Disk,
    Reported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Interpretation {
    pub antibiotic: Option<Antibiotic>,
    /// The antibiotic name exactly as supplied.
    pub antibiotic_input: String,
    pub category: OrganismCategory,
    pub call: SusceptibilityCall,
    pub confidence: Confidence,
    pub reason: InterpretationReason,
    /// Human-readable explanation of the call.
    pub note: String,
    /// Free-text caveat attached to the breakpoint set, if any.
    pub condition: Option<String>,
    /// The raw value exactly as supplied.
    pub input_value: String,
    pub method: TestMethod,
    pub magnitude: Option<f64>,
    pub site_override: Option<InfectionSite>,
    pub breakpoints: Option<String>,
    pub tier: Option<u8>,
}

impl Interpretation {
    fn new(
        classification: &Classification,
        antibiotic: Option<Antibiotic>,
        antibiotic_input: &str,
        raw: &str,
        method: TestMethod,
    ) -> Self {
        Self {
            antibiotic,
            antibiotic_input: antibiotic_input.to_string(),
            category: classification.category,
            call: SusceptibilityCall::NotApplicable,
            confidence: Confidence::Low,
            reason: InterpretationReason::NoBreakpoints,
            note: String::new(),
            condition: None,
            input_value: raw.to_string(),
            method,
            magnitude: None,
            site_override: None,
            breakpoints: None,
            tier: None,
        }
    }

    fn resolve(
        mut self,
        call: SusceptibilityCall,
        confidence: Confidence,
        reason: InterpretationReason,
        note: impl Into<String>,
    ) -> Self {
        self.call = call;
        self.confidence = confidence;
        self.reason = reason;
        self.note = note.into();
        self
    }

    fn with_set(mut self, resolved: &ResolvedBreakpoints<'_>) -> Self {
        self.site_override = resolved.site_override;
        self.breakpoints = Some(resolved.set.summary());
        self.tier = Some(resolved.set.tier);
        self.condition = resolved.set.condition.clone();
        self
    }

    /// Whether the call can be acted on without further review.
    pub fn is_reliable(&self) -> bool {
        self.confidence == Confidence::High
    }
}

enum Step<'a> {
    Done(Interpretation),
    Compare {
        base: Interpretation,
        resolved: Option<ResolvedBreakpoints<'a>>,
    },
}

/// Shared preamble: antibiotic resolution, intrinsic resistance, reported
/// categories, then breakpoint lookup. Intrinsic resistance is checked before
/// anything else about the value or the breakpoints.
fn prepare<'a>(
    catalog: &'a BreakpointCatalog,
    classification: &Classification,
    antibiotic_input: &str,
    raw: &str,
    site: Option<InfectionSite>,
    method: TestMethod,
) -> Step<'a> {
    let Some(antibiotic) = Antibiotic::resolve(antibiotic_input) else {
        let base = Interpretation::new(classification, None, antibiotic_input, raw, method);
        return Step::Done(base.resolve(
            SusceptibilityCall::NotApplicable,
            Confidence::Low,
            InterpretationReason::UnknownAntibiotic,
            format!("unrecognised antibiotic '{antibiotic_input}'"),
        ));
    };
    let base = Interpretation::new(classification, Some(antibiotic), antibiotic_input, raw, method);
    let category = classification.category;

    if catalog.is_intrinsically_resistant(category, classification.organism_id.as_deref(), antibiotic)
    {
        return Step::Done(base.resolve(
            SusceptibilityCall::Resistant,
            Confidence::High,
            InterpretationReason::IntrinsicResistance,
            format!(
                "{} is intrinsically resistant to {antibiotic}",
                classification
                    .organism_id
                    .as_deref()
                    .unwrap_or(category.display_name())
            ),
        ));
    }

    let resolved = catalog.breakpoints(category, antibiotic, site);

    if let Some(call) = SusceptibilityCall::from_reported(raw) {
        let base = match &resolved {
            Some(r) => base.with_set(r),
            None => base,
        };
        return Step::Done(base.resolve(
            call,
            Confidence::High,
            InterpretationReason::Reported,
            format!("reported by the laboratory as {call}"),
        ));
    }

    Step::Compare { base, resolved }
}

fn no_breakpoints(base: Interpretation, what: &str) -> Interpretation {
    let note = format!(
        "no {what} breakpoints available for {} in {}",
        base.antibiotic_input,
        base.category.display_name()
    );
    base.resolve(
        SusceptibilityCall::NotApplicable,
        Confidence::Low,
        InterpretationReason::NoBreakpoints,
        note,
    )
}

/// Interpret a raw MIC (or a reported category) for one antibiotic.
pub fn interpret(
    catalog: &BreakpointCatalog,
    classification: &Classification,
    antibiotic: &str,
    raw: &str,
    site: Option<InfectionSite>,
) -> Interpretation {
    let (base, resolved) =
        match prepare(catalog, classification, antibiotic, raw, site, TestMethod::Mic) {
            Step::Done(done) => return done,
            Step::Compare { base, resolved } => (base, resolved),
        };
    let Some(resolved) = resolved else {
        return no_breakpoints(base, "MIC");
    };

    let measurement = parse_measurement(raw);
    let mut base = base.with_set(&resolved);
    base.magnitude = Some(measurement.magnitude);
    let (call, confidence, reason) = compare_mic(resolved.set, &measurement);

    if !measurement.parsed {
        return base.resolve(
            call,
            Confidence::Low,
            InterpretationReason::UnparseableValue,
            format!("could not read MIC '{raw}'; treated as 0, verify before use"),
        );
    }

    let note = describe(call, reason, &measurement, resolved.set);
    base.resolve(call, confidence, reason, note)
}

/// Interpret a disk-diffusion zone diameter in millimetres.
pub fn interpret_zone(
    catalog: &BreakpointCatalog,
    classification: &Classification,
    antibiotic: &str,
    raw: &str,
    site: Option<InfectionSite>,
) -> Interpretation {
    let (base, resolved) =
        match prepare(catalog, classification, antibiotic, raw, site, TestMethod::Disk) {
            Step::Done(done) => return done,
            Step::Compare { base, resolved } => (base, resolved),
        };
    let Some((resolved, disk)) = resolved.and_then(|r| r.set.disk.as_ref().map(|d| (r, d))) else {
        return no_breakpoints(base, "disk");
    };

    let zone = parse_measurement(raw);
    let mut base = base.with_set(&resolved);
    base.magnitude = Some(zone.magnitude);

    let susceptible = disk
        .susceptible
        .as_ref()
        .is_some_and(|s| zone_at_least(&zone, s));
    let resistant = disk
        .resistant
        .as_ref()
        .is_some_and(|r| zone_at_most(&zone, r));
    let (call, confidence, reason) = if susceptible {
        (SusceptibilityCall::Susceptible, Confidence::High, InterpretationReason::Breakpoint)
    } else if resistant {
        (SusceptibilityCall::Resistant, Confidence::High, InterpretationReason::Breakpoint)
    } else if disk.intermediate.as_ref().is_some_and(|i| i.contains(&zone)) {
        (SusceptibilityCall::Intermediate, Confidence::High, InterpretationReason::Breakpoint)
    } else if disk.susceptible.is_some() && disk.resistant.is_none() {
        (SusceptibilityCall::Resistant, Confidence::Moderate, InterpretationReason::NonSusceptible)
    } else {
        (
            SusceptibilityCall::Intermediate,
            Confidence::Moderate,
            InterpretationReason::BetweenBoundaries,
        )
    };

    if !zone.parsed {
        return base.resolve(
            call,
            Confidence::Low,
            InterpretationReason::UnparseableValue,
            format!("could not read zone diameter '{raw}'; treated as 0, verify before use"),
        );
    }
    base.resolve(call, confidence, reason, format!("zone {} mm → {call}", zone.magnitude))
}

/// Core MIC comparison. S is checked first, then R, then the declared SDD
/// and I ranges.
pub fn compare_mic(
    set: &BreakpointSet,
    measurement: &Measurement,
) -> (SusceptibilityCall, Confidence, InterpretationReason) {
    if set
        .susceptible
        .as_ref()
        .is_some_and(|s| mic_at_most(measurement, s))
    {
        return (SusceptibilityCall::Susceptible, Confidence::High, InterpretationReason::Breakpoint);
    }
    if set
        .resistant
        .as_ref()
        .is_some_and(|r| mic_at_least(measurement, r))
    {
        return (SusceptibilityCall::Resistant, Confidence::High, InterpretationReason::Breakpoint);
    }
    if set.sdd.as_ref().is_some_and(|r| r.contains(measurement)) {
        return (
            SusceptibilityCall::SusceptibleDoseDependent,
            Confidence::High,
            InterpretationReason::Breakpoint,
        );
    }
    if set.intermediate.as_ref().is_some_and(|r| r.contains(measurement)) {
        return (SusceptibilityCall::Intermediate, Confidence::High, InterpretationReason::Breakpoint);
    }
    if set.susceptible.is_some() && set.resistant.is_none() {
        return (
            SusceptibilityCall::Resistant,
            Confidence::Moderate,
            InterpretationReason::NonSusceptible,
        );
    }
    (
        SusceptibilityCall::Intermediate,
        Confidence::Moderate,
        InterpretationReason::BetweenBoundaries,
    )
}

/// MIC ≤ S boundary. A measured `>x` qualifies only when `x` is strictly
/// below the boundary; a strict `<` boundary excludes equality.
fn mic_at_most(m: &Measurement, boundary: &Boundary) -> bool {
    let strict = m.operator == Some(ComparisonOp::Gt) || boundary.operator == Some(ComparisonOp::Lt);
    if strict {
        m.magnitude < boundary.value - EPSILON
    } else {
        m.magnitude <= boundary.value + EPSILON
    }
}

/// MIC ≥ R boundary. A measured `<x` qualifies only when `x` is strictly
/// above the boundary; a strict `>` boundary excludes equality.
fn mic_at_least(m: &Measurement, boundary: &Boundary) -> bool {
    let strict = m.operator == Some(ComparisonOp::Lt) || boundary.operator == Some(ComparisonOp::Gt);
    if strict {
        m.magnitude > boundary.value + EPSILON
    } else {
        m.magnitude >= boundary.value - EPSILON
    }
}

// Zones run the other way round.
fn zone_at_least(m: &Measurement, boundary: &Boundary) -> bool {
    let strict = m.operator == Some(ComparisonOp::Lt) || boundary.operator == Some(ComparisonOp::Gt);
    if strict {
        m.magnitude > boundary.value + EPSILON
    } else {
        m.magnitude >= boundary.value - EPSILON
    }
}

fn zone_at_most(m: &Measurement, boundary: &Boundary) -> bool {
    let strict = m.operator == Some(ComparisonOp::Gt) || boundary.operator == Some(ComparisonOp::Lt);
    if strict {
        m.magnitude < boundary.value - EPSILON
    } else {
        m.magnitude <= boundary.value + EPSILON
    }
}

fn describe(
    call: SusceptibilityCall,
    reason: InterpretationReason,
    measurement: &Measurement,
    set: &BreakpointSet,
) -> String {
    let value = match measurement.operator {
        Some(op) => format!("{op}{}", measurement.magnitude),
        None => measurement.magnitude.to_string(),
    };
    match reason {
        InterpretationReason::BetweenBoundaries => format!(
            "MIC {value} lies between breakpoints ({}) with no declared range; reported as {call}",
            set.summary()
        ),
        InterpretationReason::NonSusceptible => format!(
            "MIC {value} is above the susceptible breakpoint ({}); non-susceptible",
            set.summary()
        ),
        _ => format!("MIC {value} against {} → {call}", set.summary()),
    }
}
