use std::io::Write;

use abx_breakpoints::catalog::BreakpointCatalog;
use abx_breakpoints::classifier::classify;
use abx_breakpoints::source::FileSource;
use abx_core::models::antibiotic::Antibiotic;
use abx_core::models::mechanism::Mechanism;
use abx_regimens::catalog::{Preference, RegimenCatalog};
use abx_regimens::error::RegimenError;
use abx_regimens::scope::{Intensity, ResistanceSetting};
use test_case::test_case;

fn document(regimens: &str) -> String {
    format!(r#"{{ "version": "test-1", "published": "2024-03-01", "regimens": [{regimens}] }}"#)
}

const STANDARD: &str = r#"{
    "id": "ecoli-standard",
    "organism": "escherichia_coli",
    "name": "Standard",
    "condition": "Non-severe infection with low local resistance",
    "primary": true,
    "options": [
        { "antibiotic": "ceftriaxone", "dose": "1 g", "route": "IV", "frequency": "q24h" },
        { "antibiotic": "tmp-smx", "dose": "160/800 mg", "route": "PO", "frequency": "q12h" }
    ]
}"#;

#[test]
fn embedded_catalog_loads() {
    let catalog = RegimenCatalog::embedded().unwrap();
    assert_eq!(catalog.version, "2024.1");
    assert!(catalog.organisms().any(|o| o == "escherichia_coli"));
    assert!(catalog.organisms().any(|o| o == "enterobacterales"));
    assert!(catalog.get("ecoli-esbl").is_some());
}

#[test]
fn candidates_prefer_the_organism_entry() {
    let breakpoints = BreakpointCatalog::embedded().unwrap();
    let regimens = RegimenCatalog::embedded().unwrap();

    let c = classify(&breakpoints, "E. coli");
    let found = regimens.candidates(&c).unwrap();
    assert_eq!(found.matched_key, "escherichia_coli");
    assert!(found.regimens.iter().all(|r| r.organism == "escherichia_coli"));
}

#[test_case("citrobacter_freundii", "enterobacterales" ; "organism without its own entry")]
#[test_case("staphylococcus_epidermidis", "staphylococcus" ; "coagulase negative staph")]
#[test_case("pseudomonas_aeruginosa", "pseudomonas_aeruginosa" ; "organism entry")]
fn candidates_fall_back_to_the_category_entry(organism: &str, key: &str) {
    let breakpoints = BreakpointCatalog::embedded().unwrap();
    let regimens = RegimenCatalog::embedded().unwrap();
    let found = regimens.candidates(&classify(&breakpoints, organism)).unwrap();
    assert_eq!(found.matched_key, key);
}

#[test]
fn unmapped_organisms_have_no_candidates() {
    let breakpoints = BreakpointCatalog::embedded().unwrap();
    let regimens = RegimenCatalog::embedded().unwrap();
    assert!(regimens.candidates(&classify(&breakpoints, "mycoplasma_genitalium")).is_none());
}

#[test]
fn options_resolve_aliases_and_default_preference() {
    let catalog = RegimenCatalog::from_json(&document(STANDARD)).unwrap();
    let regimen = &catalog.regimens("Escherichia coli")[0];
    assert_eq!(regimen.options[0].antibiotic, Antibiotic::Ceftriaxone);
    assert_eq!(regimen.options[0].preference, Preference::Primary);
    assert_eq!(regimen.options[1].antibiotic, Antibiotic::TrimethoprimSulfamethoxazole);
    assert_eq!(regimen.options[1].preference, Preference::Alternative);
    assert_eq!(catalog.published.month(), 3);
}

#[test]
fn scope_is_inferred_from_the_condition_text() {
    let catalog = RegimenCatalog::from_json(&document(STANDARD)).unwrap();
    let scope = &catalog.regimens("escherichia_coli")[0].scope;
    assert_eq!(scope.intensity, Intensity::Low);
    assert_eq!(scope.resistance, ResistanceSetting::Low);
    assert!(scope.targets.is_empty());
    assert!(scope.inferred);
    assert!(scope.is_low_intensity());
}

#[test]
fn declared_scope_wins_over_the_condition_text() {
    let catalog = RegimenCatalog::embedded().unwrap();
    let cre = catalog.get("ecoli-cre").unwrap();
    assert!(!cre.scope.inferred);
    assert!(cre.scope.targets(Mechanism::Carbapenemase));
    assert!(cre.scope.is_high_intensity());

    // Targets declared, intensity and resistance read from the text.
    let esbl = catalog.get("ecoli-esbl").unwrap();
    assert!(esbl.scope.targets(Mechanism::Esbl));
    assert_eq!(esbl.scope.intensity, Intensity::High);
    assert_eq!(esbl.scope.resistance, ResistanceSetting::High);
}

#[test]
fn clinical_context_is_carried_through() {
    let text = document(&STANDARD.replace(
        r#""primary": true,"#,
        r#""population": "Adults, community onset", "infection_source": "Urinary tract", "primary": true,"#,
    ));
    let catalog = RegimenCatalog::from_json(&text).unwrap();
    let regimen = &catalog.regimens("escherichia_coli")[0];
    assert_eq!(regimen.population.as_deref(), Some("Adults, community onset"));
    assert_eq!(regimen.infection_source.as_deref(), Some("Urinary tract"));

    let bare = RegimenCatalog::from_json(&document(STANDARD)).unwrap();
    assert_eq!(bare.regimens("escherichia_coli")[0].population, None);
    assert_eq!(bare.regimens("escherichia_coli")[0].infection_source, None);

    let embedded = RegimenCatalog::embedded().unwrap();
    let mssa = embedded.get("sa-mssa").unwrap();
    assert_eq!(mssa.population.as_deref(), Some("Adults"));
    assert!(mssa.infection_source.is_some());
}

#[test_case("sa-mssa" ; "methicillin susceptible")]
#[test_case("efs-standard" ; "ampicillin susceptible")]
#[test_case("ab-standard" ; "carbapenem susceptible")]
#[test_case("efs-vre" ; "vancomycin resistant")]
#[test_case("sa-mrsa" ; "methicillin resistant")]
fn isolate_phenotype_wording_does_not_set_the_resistance_setting(id: &str) {
    let catalog = RegimenCatalog::embedded().unwrap();
    let scope = &catalog.get(id).unwrap().scope;
    assert_eq!(scope.resistance, ResistanceSetting::Standard);
    assert!(!scope.is_high_intensity());
    assert!(!scope.is_low_intensity());
}

#[test]
fn duplicate_regimen_ids_are_rejected() {
    let text = document(&format!("{STANDARD}, {STANDARD}"));
    let err = RegimenCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, RegimenError::DuplicateRegimen { id } if id == "ecoli-standard"));
}

#[test]
fn unknown_antibiotics_are_rejected() {
    let text = document(&STANDARD.replace("ceftriaxone", "unobtainium"));
    let err = RegimenCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, RegimenError::UnknownAntibiotic { name, .. } if name == "unobtainium"));
}

#[test]
fn repeated_options_are_rejected() {
    let text = document(&STANDARD.replace("ceftriaxone", "bactrim"));
    let err = RegimenCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, RegimenError::DuplicateOption { .. }));
}

#[test]
fn empty_regimens_are_rejected() {
    let text = document(
        r#"{ "id": "x", "organism": "escherichia_coli", "name": "x", "condition": "x", "options": [] }"#,
    );
    assert!(matches!(
        RegimenCatalog::from_json(&text).unwrap_err(),
        RegimenError::EmptyRegimen { .. }
    ));
}

#[test]
fn regimens_load_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(document(STANDARD).as_bytes()).unwrap();
    let catalog = RegimenCatalog::load(&FileSource::new(file.path())).unwrap();
    assert_eq!(catalog.version, "test-1");
}

#[test]
fn a_missing_file_is_a_source_error() {
    let err = RegimenCatalog::load(&FileSource::new("/nonexistent/regimens.json")).unwrap_err();
    assert!(matches!(err, RegimenError::Source(_)));
}
