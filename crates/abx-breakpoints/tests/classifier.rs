use abx_breakpoints::catalog::BreakpointCatalog;
use abx_breakpoints::classifier::{MatchMethod, classify};
use abx_core::models::assessment::Confidence;
use abx_core::models::organism::OrganismCategory;
use test_case::test_case;

#[test_case("escherichia_coli", "escherichia_coli" ; "canonical id")]
#[test_case("Escherichia coli", "escherichia_coli" ; "display name")]
#[test_case("E. coli", "escherichia_coli" ; "abbreviation alias")]
#[test_case("MRSA", "staphylococcus_aureus" ; "phenotype alias")]
#[test_case("Enterobacter aerogenes", "klebsiella_aerogenes" ; "former name")]
fn exact_matches_resolve_the_catalog_organism(input: &str, id: &str) {
    let catalog = BreakpointCatalog::embedded().unwrap();
    let c = classify(&catalog, input);
    assert_eq!(c.method, MatchMethod::Exact);
    assert_eq!(c.organism_id.as_deref(), Some(id));
    assert_eq!(c.confidence, Confidence::High);
}

#[test_case("klebsiella_variicola" ; "unlisted species")]
#[test_case("Klebsiella spp." ; "genus only")]
#[test_case("hypermucoviscous klebsiella isolate" ; "embedded in text")]
#[test_case("KLEBSIELLA-OZAENAE" ; "upper case with hyphen")]
fn any_klebsiella_is_enterobacterales(input: &str) {
    let catalog = BreakpointCatalog::embedded().unwrap();
    let c = classify(&catalog, input);
    assert_eq!(c.category, OrganismCategory::Enterobacterales);
    assert_eq!(c.method, MatchMethod::Pattern);
    assert_eq!(c.matched_fragment.as_deref(), Some("klebsiella"));
    assert_eq!(c.confidence, Confidence::Moderate);
}

#[test_case("peptostreptococcus_micros", OrganismCategory::Anaerobes ; "anaerobe before streptococcus")]
#[test_case("streptococcus_pneumoniae_serotype_19a", OrganismCategory::StreptococcusPneumoniae ; "pneumococcus before viridans")]
#[test_case("streptococcus_salivarius", OrganismCategory::ViridansStreptococci ; "other streptococci are viridans")]
#[test_case("group_b_strep", OrganismCategory::BetaHemolyticStreptococci ; "group b")]
#[test_case("staphylococcus_hominis", OrganismCategory::Staphylococcus ; "other staphylococci")]
#[test_case("vre_faecium", OrganismCategory::Enterococcus ; "enterococcus by species")]
#[test_case("pseudomonas_putida", OrganismCategory::Pseudomonas ; "other pseudomonads")]
#[test_case("stenotrophomonas_sp", OrganismCategory::Stenotrophomonas ; "stenotrophomonas")]
#[test_case("haemophilus_ducreyi", OrganismCategory::Haemophilus ; "haemophilus")]
fn fragments_follow_table_order(input: &str, expected: OrganismCategory) {
    let catalog = BreakpointCatalog::embedded().unwrap();
    assert_eq!(classify(&catalog, input).category, expected);
}

#[test_case("" ; "empty")]
#[test_case("candida_albicans" ; "yeast")]
#[test_case("   " ; "whitespace")]
fn unknown_organisms_fall_back_to_other(input: &str) {
    let catalog = BreakpointCatalog::embedded().unwrap();
    let c = classify(&catalog, input);
    assert_eq!(c.category, OrganismCategory::Other);
    assert_eq!(c.method, MatchMethod::Fallback);
    assert_eq!(c.confidence, Confidence::Low);
    assert!(c.is_fallback());
}

#[test]
fn genus_is_reported_for_pattern_matches() {
    let catalog = BreakpointCatalog::embedded().unwrap();
    let c = classify(&catalog, "Enterobacter hormaechei");
    assert_eq!(c.genus.as_deref(), Some("enterobacter"));
    assert_eq!(c.organism_key(), "enterobacter_hormaechei");
}
