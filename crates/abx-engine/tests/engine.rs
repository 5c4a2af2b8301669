use std::sync::Arc;

use abx_audit::{EngineEvent, RecordingTelemetry};
use abx_breakpoints::classifier::MatchMethod;
use abx_breakpoints::comparator::InterpretationReason;
use abx_core::models::antibiotic::Antibiotic;
use abx_core::models::case::{CaseContext, InfectionSyndrome, LocalResistanceRates};
use abx_core::models::organism::OrganismCategory;
use abx_engine::{CaseRequest, Engine, EngineError, SusceptibilityInput};
use abx_regimens::epidemiology::ResistanceDefaults;
use abx_regimens::error::RegimenError;
use abx_regimens::selection::Selection;

fn engine() -> (Engine, Arc<RecordingTelemetry>) {
    let telemetry = Arc::new(RecordingTelemetry::new());
    let engine = Engine::embedded().unwrap().with_telemetry(telemetry.clone());
    (engine, telemetry)
}

#[test]
fn pattern_matches_are_reported() {
    let (engine, telemetry) = engine();
    let c = engine.classify("Klebsiella variicola");
    assert_eq!(c.method, MatchMethod::Pattern);
    assert_eq!(c.category, OrganismCategory::Enterobacterales);
    assert!(matches!(
        telemetry.events().as_slice(),
        [EngineEvent::OrganismPatternMatch { fragment, .. }] if fragment == "klebsiella"
    ));
}

#[test]
fn exact_matches_are_silent() {
    let (engine, telemetry) = engine();
    assert_eq!(engine.classify("E. coli").method, MatchMethod::Exact);
    assert!(telemetry.events().is_empty());
}

#[test]
fn unmapped_organisms_end_in_no_suitable_option() {
    let (engine, telemetry) = engine();
    let report = engine
        .recommend(&CaseRequest::new("mycoplasma_hominis").mic("doxycycline", "0.5"))
        .unwrap();

    assert!(report.classification.is_fallback());
    assert_eq!(report.regimen_source, None);
    assert!(matches!(report.selection, Selection::NoSuitableOption { .. }));
    assert_eq!(
        telemetry.names(),
        ["organism_fallback", "breakpoints_missing", "no_suitable_option"]
    );
}

#[test]
fn unusable_results_stay_out_of_the_profile() {
    let (engine, telemetry) = engine();
    let request = CaseRequest::new("escherichia_coli")
        .mic("ceftriaxone", "abc")
        .mic("unobtainium", "1")
        .mic("vancomycin", "2")
        .mic("ciprofloxacin", "≤0.25");
    let report = engine.recommend(&request).unwrap();

    // Vancomycin is intrinsic for Enterobacterales and stays in as R.
    assert_eq!(report.profile.len(), 2);
    assert!(report.profile.is_resistant(Antibiotic::Vancomycin));
    assert!(report.profile.is_susceptible(Antibiotic::Ciprofloxacin));
    let reasons: Vec<InterpretationReason> =
        report.excluded_results.iter().map(|e| e.reason).collect();
    assert_eq!(
        reasons,
        [InterpretationReason::UnparseableValue, InterpretationReason::UnknownAntibiotic]
    );

    let names = telemetry.names();
    assert!(names.contains(&"unparseable_value"));
    assert!(names.contains(&"unknown_antibiotic"));
    assert!(names.contains(&"intrinsic_resistance"));

    let rec = report.selection.recommendation().unwrap();
    assert_eq!(rec.regimen_id, "ecoli-standard");
    assert_eq!(rec.chosen.antibiotic, Antibiotic::Ciprofloxacin);
}

#[test]
fn repeated_antibiotics_keep_the_last_usable_entry() {
    let (engine, telemetry) = engine();
    let request = CaseRequest::new("escherichia_coli")
        .mic("ciprofloxacin", "S")
        .mic("Ciprofloxacin", "R")
        .mic("ceftriaxone", "S")
        .mic("ceftriaxone", "abc");
    let report = engine.recommend(&request).unwrap();

    assert_eq!(report.profile.len(), 2);
    assert!(report.profile.is_resistant(Antibiotic::Ciprofloxacin));
    assert!(report.profile.is_susceptible(Antibiotic::Ceftriaxone));

    let superseded: Vec<_> = report.excluded_results.iter().filter(|e| e.superseded).collect();
    assert_eq!(superseded.len(), 1);
    assert_eq!(superseded[0].antibiotic, "ciprofloxacin");
    assert_eq!(superseded[0].value, "S");
    assert_eq!(superseded[0].reason, InterpretationReason::Reported);

    let unreadable = report
        .excluded_results
        .iter()
        .find(|e| e.reason == InterpretationReason::UnparseableValue)
        .unwrap();
    assert!(!unreadable.superseded);

    assert!(telemetry.events().contains(&EngineEvent::DuplicateResult {
        antibiotic: "ciprofloxacin".to_string(),
        value: "S".to_string(),
    }));
}

#[test]
fn disk_results_are_interpreted_as_zones() {
    let (engine, _) = engine();
    let request = CaseRequest::new("escherichia_coli")
        .result(SusceptibilityInput::disk("ceftriaxone", "25"));
    let report = engine.recommend(&request).unwrap();
    assert!(report.profile.is_susceptible(Antibiotic::Ceftriaxone));
    assert_eq!(
        report.selection.recommendation().unwrap().chosen.antibiotic,
        Antibiotic::Ceftriaxone
    );
}

#[test]
fn allergies_are_resolved_and_unknown_labels_reported() {
    let (engine, telemetry) = engine();
    let request = CaseRequest::new("escherichia_coli")
        .mic("ceftriaxone", "S")
        .mic("ciprofloxacin", "S")
        .with_case(CaseContext {
            allergies: vec!["cephalosporins".into(), "shellfish".into()],
            ..Default::default()
        });
    let report = engine.recommend(&request).unwrap();
    assert_eq!(report.allergies.unrecognized, ["shellfish"]);
    assert_eq!(
        report.selection.recommendation().unwrap().chosen.antibiotic,
        Antibiotic::Ciprofloxacin
    );
    assert!(telemetry.events().contains(&EngineEvent::UnrecognizedAllergy {
        label: "shellfish".into()
    }));
}

#[test]
fn skipped_regimens_are_reported() {
    let (engine, telemetry) = engine();
    let request = CaseRequest::new("escherichia_coli")
        .mic("ceftriaxone", "R")
        .mic("ceftazidime", "R")
        .mic("meropenem", "S")
        .mic("ertapenem", "S")
        .mic("ciprofloxacin", "S")
        .with_case(CaseContext {
            allergies: vec!["carbapenem".into()],
            ..Default::default()
        });
    let report = engine.recommend(&request).unwrap();
    let rec = report.selection.recommendation().unwrap();
    assert_eq!(rec.regimen_id, "ecoli-standard");
    assert!(telemetry.events().contains(&EngineEvent::RegimenFallback {
        regimen_id: "ecoli-esbl".into(),
        score: 20,
    }));
}

#[test]
fn out_of_range_local_rates_are_an_error() {
    let (engine, _) = engine();
    let request = CaseRequest::new("escherichia_coli").with_case(CaseContext {
        local_rates: Some(LocalResistanceRates {
            esbl_rate: Some(-0.1),
            ..Default::default()
        }),
        ..Default::default()
    });
    let err = engine.recommend(&request).unwrap_err();
    assert!(matches!(err, EngineError::Regimens(RegimenError::InvalidInput(_))));
}

#[test]
fn configured_default_rates_feed_epidemiology() {
    let mut defaults = ResistanceDefaults::default();
    defaults
        .apply(
            "escherichia",
            &LocalResistanceRates {
                esbl_rate: Some(0.35),
                carbapenem_resistance_rate: Some(0.15),
                institution_type: None,
            },
        )
        .unwrap();
    let (engine, _) = engine();
    let engine = engine.with_default_rates(defaults);
    let epi = engine.assess_epidemiology("escherichia", None).unwrap();
    assert_eq!(epi.risk_score, 4);
}

#[test]
fn interpretation_is_repeatable() {
    let (engine, _) = engine();
    let a = engine.interpret("klebsiella_pneumoniae", "cefepime", "4", None);
    let b = engine.interpret("klebsiella_pneumoniae", "cefepime", "4", None);
    assert_eq!(a, b);
}

#[test]
fn reports_carry_identity_and_versions() {
    let (engine, _) = engine();
    let request = CaseRequest::new("staphylococcus_aureus")
        .mic("oxacillin", "R")
        .mic("vancomycin", "1")
        .with_case(CaseContext {
            syndrome: InfectionSyndrome::Bacteremia,
            ..Default::default()
        });
    let a = engine.recommend(&request).unwrap();
    let b = engine.recommend(&request).unwrap();
    assert_ne!(a.request_id, b.request_id);
    assert_eq!(a.knowledge_base.breakpoints, "M100-Ed34");
    assert_eq!(a.knowledge_base.regimens, "2024.1");
    assert!(a.mechanisms.mrsa.suspected);
    assert_eq!(a.selection.recommendation().unwrap().chosen.antibiotic, Antibiotic::Vancomycin);

    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["selection"]["outcome"], "recommended");
}

#[test]
fn requests_deserialize_with_defaults() {
    let request: CaseRequest = serde_json::from_str(
        r#"{
            "organism": "e_coli",
            "results": [{ "antibiotic": "ceftriaxone", "value": "≤1" }],
            "case": { "syndrome": "pyelonephritis", "age_years": 70 }
        }"#,
    )
    .unwrap();
    assert_eq!(request.results[0].method, abx_engine::ResultMethod::Mic);
    assert_eq!(request.case.syndrome, InfectionSyndrome::Pyelonephritis);
    assert!(!request.case.is_icu);
}
