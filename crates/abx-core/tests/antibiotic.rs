use abx_core::models::antibiotic::{Antibiotic, DrugClass};
use abx_core::normalize_key;
use test_case::test_case;

#[test_case("Ceftriaxone", Antibiotic::Ceftriaxone ; "canonical, capitalised")]
#[test_case("tmp-smx", Antibiotic::TrimethoprimSulfamethoxazole ; "abbreviation")]
#[test_case("TMP/SMX", Antibiotic::TrimethoprimSulfamethoxazole ; "slash separated abbreviation")]
#[test_case("Piperacillin/Tazobactam", Antibiotic::PiperacillinTazobactam ; "slash separated combination")]
#[test_case("piperacillin_tazobactam", Antibiotic::PiperacillinTazobactam ; "snake case combination")]
#[test_case(" cipro ", Antibiotic::Ciprofloxacin ; "padded short name")]
#[test_case("Rifampicin", Antibiotic::Rifampin ; "international name")]
fn resolves_names_and_aliases(raw: &str, expected: Antibiotic) {
    assert_eq!(Antibiotic::resolve(raw), Some(expected));
}

#[test]
fn unknown_names_do_not_resolve() {
    assert_eq!(Antibiotic::resolve("unobtainium"), None);
    assert_eq!(Antibiotic::resolve(""), None);
    assert!("unobtainium".parse::<Antibiotic>().is_err());
}

#[test]
fn every_canonical_name_round_trips_through_serde() {
    for antibiotic in Antibiotic::ALL {
        let json = serde_json::to_string(&antibiotic).unwrap();
        assert_eq!(json, format!("\"{}\"", antibiotic.name()));
        assert_eq!(Antibiotic::resolve(antibiotic.name()), Some(antibiotic));
    }
}

#[test]
fn beta_lactam_family_excludes_monobactams() {
    assert!(Antibiotic::Meropenem.class().is_beta_lactam());
    assert!(Antibiotic::Ceftriaxone.class().is_beta_lactam());
    assert!(Antibiotic::Ampicillin.class().is_beta_lactam());
    assert_eq!(Antibiotic::Aztreonam.class(), DrugClass::Monobactam);
    assert!(!Antibiotic::Aztreonam.class().is_beta_lactam());
}

#[test]
fn class_labels_accept_plural_and_colloquial_forms() {
    assert_eq!(DrugClass::from_label("Penicillins"), Some(DrugClass::Penicillin));
    assert_eq!(DrugClass::from_label("sulfa"), Some(DrugClass::FolatePathwayInhibitor));
    assert_eq!(DrugClass::from_label("quinolones"), Some(DrugClass::Fluoroquinolone));
    assert_eq!(DrugClass::from_label("chocolate"), None);
}

#[test]
fn normalize_collapses_separator_runs() {
    assert_eq!(normalize_key("  Klebsiella  pneumoniae ", '_'), "klebsiella_pneumoniae");
    assert_eq!(normalize_key("E. coli", '_'), "e_coli");
    assert_eq!(normalize_key("--a__b--", '-'), "a-b");
}
