use abx_breakpoints::catalog::BreakpointCatalog;
use abx_breakpoints::classifier::classify;
use abx_core::models::antibiotic::Antibiotic::{self, *};
use abx_core::models::case::{CaseContext, InfectionSite, InfectionSyndrome};
use abx_core::models::susceptibility::SusceptibilityCall::{self, *};
use abx_core::models::susceptibility::SusceptibilityProfile;
use abx_regimens::allergy::{AllergyProfile, AllergyTarget};
use abx_regimens::catalog::RegimenCatalog;
use abx_regimens::epidemiology::{ResistanceDefaults, assess_epidemiology};
use abx_regimens::mechanisms::detect;
use abx_regimens::penetration::Penetration;
use abx_regimens::selection::{
    ExclusionReason, NO_SUITABLE_OPTION, Selection, SelectionInput, rank_options, select_regimen,
};
use abx_regimens::severity::assess_severity;

struct Case {
    organism: &'static str,
    syndrome: InfectionSyndrome,
    is_icu: bool,
    calls: Vec<(Antibiotic, SusceptibilityCall)>,
    allergies: Vec<&'static str>,
}

impl Case {
    fn ecoli(calls: &[(Antibiotic, SusceptibilityCall)]) -> Self {
        Self {
            organism: "escherichia_coli",
            syndrome: InfectionSyndrome::Other,
            is_icu: false,
            calls: calls.to_vec(),
            allergies: Vec::new(),
        }
    }

    fn select(&self) -> Selection {
        let breakpoints = BreakpointCatalog::embedded().unwrap();
        let regimens = RegimenCatalog::embedded().unwrap();
        let classification = classify(&breakpoints, self.organism);
        let profile = self
            .calls
            .iter()
            .fold(SusceptibilityProfile::new(), |p, (a, c)| p.with(*a, *c));
        let context = CaseContext {
            syndrome: self.syndrome,
            is_icu: self.is_icu,
            ..Default::default()
        };
        let severity = assess_severity(&context);
        let mechanisms = detect(&profile, &classification);
        let epidemiology = assess_epidemiology(
            classification.genus.as_deref().unwrap_or_default(),
            None,
            &ResistanceDefaults::default(),
        )
        .unwrap();
        let allergies = AllergyProfile::resolve(&self.allergies);
        let candidates = regimens.candidates(&classification).unwrap();
        select_regimen(&SelectionInput {
            regimens: candidates.regimens,
            severity: &severity,
            mechanisms: &mechanisms,
            epidemiology: &epidemiology,
            profile: &profile,
            allergies: &allergies,
            site: self.syndrome.site(),
        })
    }
}

const ESBL_PANEL: &[(Antibiotic, SusceptibilityCall)] =
    &[(Ceftriaxone, Resistant), (Ceftazidime, Resistant), (Meropenem, Susceptible)];

#[test]
fn esbl_pattern_selects_a_carbapenem() {
    let selection = Case::ecoli(ESBL_PANEL).select();
    let rec = selection.recommendation().unwrap();
    assert_eq!(rec.regimen_id, "ecoli-esbl");
    assert_eq!(rec.chosen.antibiotic, Meropenem);
    assert!(rec.alternatives.is_empty());
    assert!(rec.excluded.iter().any(|e| e.antibiotic == Ertapenem && e.reason == ExclusionReason::NotTested));
    assert!(rec.skipped.is_empty());
    assert!(rec.rationale.iter().any(|line| line.contains("ESBL")));
}

#[test]
fn esbl_pattern_penalizes_low_intensity_regimens_in_severe_illness() {
    let case = Case {
        syndrome: InfectionSyndrome::Endocarditis,
        is_icu: true,
        ..Case::ecoli(ESBL_PANEL)
    };
    let selection = case.select();
    let standard = selection
        .scores()
        .iter()
        .find(|s| s.regimen_id == "ecoli-standard")
        .unwrap();
    assert!(standard.contributions.iter().any(|c| c.rule == "severe_low_intensity"));
    assert!(standard.contributions.iter().any(|c| c.rule == "esbl_untargeted"));
    assert_eq!(selection.recommendation().unwrap().regimen_id, "ecoli-esbl");
}

#[test]
fn cascades_when_the_best_regimen_has_no_usable_drug() {
    let mut calls = ESBL_PANEL.to_vec();
    calls.push((Ciprofloxacin, Susceptible));
    let case = Case {
        allergies: vec!["carbapenems"],
        ..Case::ecoli(&calls)
    };
    let rec = case.select().recommendation().cloned().unwrap();
    assert_eq!(rec.skipped.len(), 1);
    assert_eq!(rec.skipped[0].regimen_id, "ecoli-esbl");
    assert!(rec.skipped[0].excluded.iter().any(|e| matches!(
        e.reason,
        ExclusionReason::Allergy { target: AllergyTarget::Class(_) }
    )));
    assert_eq!(rec.regimen_id, "ecoli-standard");
    assert_eq!(rec.chosen.antibiotic, Ciprofloxacin);
    assert!(rec.excluded.iter().any(|e| e.antibiotic == Ceftriaxone
        && e.reason == ExclusionReason::NotSusceptible { call: Resistant }));
}

#[test]
fn no_usable_drug_anywhere_is_an_explicit_result() {
    let selection = Case::ecoli(&[(Ceftriaxone, Resistant), (Meropenem, Resistant)]).select();
    match &selection {
        Selection::NoSuitableOption { message, scores, skipped } => {
            assert_eq!(message, NO_SUITABLE_OPTION);
            assert_eq!(scores.len(), 4);
            assert_eq!(skipped.len(), 4);
        }
        Selection::Recommended(rec) => panic!("unexpected recommendation {}", rec.regimen_id),
    }
    assert!(!selection.is_recommended());
}

#[test]
fn intermediate_and_dose_dependent_results_are_not_usable() {
    let selection = Case::ecoli(&[(Ceftriaxone, Intermediate), (Cefepime, SusceptibleDoseDependent)]).select();
    assert!(!selection.is_recommended());
}

#[test]
fn options_rank_by_penetration_then_preference() {
    let regimens = RegimenCatalog::embedded().unwrap();
    let standard = regimens.get("ecoli-standard").unwrap();
    let profile = [Ceftriaxone, Ciprofloxacin, TrimethoprimSulfamethoxazole, Nitrofurantoin]
        .into_iter()
        .fold(SusceptibilityProfile::new(), |p, a| p.with(a, Susceptible));

    let (blood, excluded) = rank_options(standard, &profile, &AllergyProfile::default(), InfectionSite::Bloodstream);
    assert!(excluded.is_empty());
    let order: Vec<Antibiotic> = blood.iter().map(|o| o.antibiotic).collect();
    assert_eq!(order, [Ceftriaxone, Ciprofloxacin, TrimethoprimSulfamethoxazole, Nitrofurantoin]);
    assert_eq!(blood[3].penetration, Penetration::Avoid);

    let (cystitis, _) = rank_options(
        standard,
        &profile,
        &AllergyProfile::default(),
        InfectionSite::UncomplicatedUrinaryTract,
    );
    assert_eq!(cystitis[0].penetration, Penetration::Excellent);
    assert_eq!(cystitis.last().unwrap().antibiotic, Ceftriaxone);
}

#[test]
fn selection_serializes_with_an_outcome_tag() {
    let selection = Case::ecoli(ESBL_PANEL).select();
    let json = serde_json::to_value(&selection).unwrap();
    assert_eq!(json["outcome"], "recommended");
    assert_eq!(json["chosen"]["antibiotic"], "meropenem");
}
