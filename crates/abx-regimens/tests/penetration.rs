use abx_core::models::antibiotic::Antibiotic::{self, *};
use abx_core::models::case::{InfectionSite, InfectionSyndrome};
use abx_regimens::penetration::{Penetration, penetration};
use test_case::test_case;

#[test_case(InfectionSite::Meningitis, Ceftriaxone, Penetration::Excellent ; "ceftriaxone crosses the meninges")]
#[test_case(InfectionSite::Meningitis, Cefazolin, Penetration::Poor ; "cefazolin does not")]
#[test_case(InfectionSite::Meningitis, Gentamicin, Penetration::Poor ; "class entry")]
#[test_case(InfectionSite::Meningitis, Daptomycin, Penetration::Avoid ; "daptomycin in csf")]
#[test_case(InfectionSite::Respiratory, Daptomycin, Penetration::Avoid ; "daptomycin inactivated by surfactant")]
#[test_case(InfectionSite::UncomplicatedUrinaryTract, Nitrofurantoin, Penetration::Excellent ; "nitrofurantoin in cystitis")]
#[test_case(InfectionSite::Bloodstream, Nitrofurantoin, Penetration::Avoid ; "nitrofurantoin in blood")]
#[test_case(InfectionSite::Other, Fosfomycin, Penetration::Avoid ; "urinary agent elsewhere")]
#[test_case(InfectionSite::Bloodstream, Meropenem, Penetration::Excellent ; "carbapenem class in blood")]
#[test_case(InfectionSite::SkinSoftTissue, Ceftriaxone, Penetration::Good ; "unlisted drug is good")]
fn site_penetration(site: InfectionSite, antibiotic: Antibiotic, expected: Penetration) {
    assert_eq!(penetration(site, antibiotic), expected);
}

#[test]
fn levels_sort_best_first() {
    let mut levels = vec![Penetration::Avoid, Penetration::Good, Penetration::Excellent, Penetration::Poor];
    levels.sort();
    assert_eq!(
        levels,
        [Penetration::Excellent, Penetration::Good, Penetration::Poor, Penetration::Avoid]
    );
}

#[test]
fn syndromes_map_onto_sites() {
    assert_eq!(InfectionSyndrome::CnsMeningitis.site(), InfectionSite::Meningitis);
    assert_eq!(penetration(InfectionSyndrome::UncomplicatedUti.site(), Fosfomycin), Penetration::Excellent);
}
