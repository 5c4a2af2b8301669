//! Resistance mechanism detection from a susceptibility profile.
//!
//! Each mechanism is an independent predicate over the S/I/R map. An empty
//! profile yields "not suspected" for everything.

use abx_breakpoints::classifier::Classification;
use abx_core::models::antibiotic::Antibiotic;
use abx_core::models::mechanism::{Mechanism, MechanismFinding, MechanismReport};
use abx_core::models::organism::OrganismCategory;
use abx_core::models::susceptibility::{SusceptibilityCall, SusceptibilityProfile};

pub const THIRD_GENERATION_CEPHALOSPORINS: [Antibiotic; 4] = [
    Antibiotic::Ceftriaxone,
    Antibiotic::Cefotaxime,
    Antibiotic::Ceftazidime,
    Antibiotic::Cefpodoxime,
];

/// Agents hydrolysed by even basal chromosomal AmpC.
pub const FIRST_GENERATION_CEPHALOSPORINS_AND_CEPHAMYCINS: [Antibiotic; 2] =
    [Antibiotic::Cefazolin, Antibiotic::Cefoxitin];

pub const CARBAPENEMS: [Antibiotic; 3] = [
    Antibiotic::Ertapenem,
    Antibiotic::Imipenem,
    Antibiotic::Meropenem,
];

/// Genera carrying an inducible chromosomal AmpC.
pub const AMPC_GENERA: &[&str] = &[
    "enterobacter",
    "citrobacter",
    "serratia",
    "morganella",
    "providencia",
    "hafnia",
];

/// AmpC producers outside [`AMPC_GENERA`] (reclassified species).
pub const AMPC_ORGANISMS: &[&str] = &["klebsiella_aerogenes"];

const ESBL_PATTERN: &str = "R to ≥2 third-generation cephalosporins with a susceptible carbapenem";
const AMPC_PATTERN: &str = "AmpC-prone genus, R to a third-generation cephalosporin, cefazolin or cefoxitin with a susceptible carbapenem";
const CARBAPENEMASE_PATTERN: &str = "R to any of ertapenem, imipenem, meropenem";
const MRSA_PATTERN: &str = "Staphylococcus with oxacillin or cefoxitin R";
const VRE_PATTERN: &str = "Enterococcus with vancomycin R";

fn matching(
    profile: &SusceptibilityProfile,
    panel: &[Antibiotic],
    call: SusceptibilityCall,
) -> Vec<Antibiotic> {
    panel
        .iter()
        .copied()
        .filter(|a| profile.is(*a, call))
        .collect()
}

fn suspected(
    mechanism: Mechanism,
    pattern: &str,
    confidence: f64,
    supporting: Vec<Antibiotic>,
    implication: &str,
) -> MechanismFinding {
    MechanismFinding {
        mechanism,
        suspected: true,
        confidence,
        supporting,
        pattern: pattern.to_string(),
        implication: implication.to_string(),
    }
}

pub fn detect_esbl(profile: &SusceptibilityProfile) -> MechanismFinding {
    let resistant = matching(profile, &THIRD_GENERATION_CEPHALOSPORINS, SusceptibilityCall::Resistant);
    let active = matching(profile, &CARBAPENEMS, SusceptibilityCall::Susceptible);
    if resistant.len() < 2 || active.is_empty() {
        return MechanismFinding::not_suspected(Mechanism::Esbl, ESBL_PATTERN);
    }
    suspected(
        Mechanism::Esbl,
        ESBL_PATTERN,
        1.0,
        resistant.into_iter().chain(active).collect(),
        "Avoid cephalosporins and piperacillin-tazobactam for serious infection; a carbapenem is the treatment of choice.",
    )
}

pub fn is_ampc_prone(classification: &Classification) -> bool {
    let organism = classification.organism_key();
    AMPC_ORGANISMS.contains(&organism)
        || classification
            .genus
            .as_deref()
            .is_some_and(|g| AMPC_GENERA.contains(&g))
}

pub fn detect_ampc(
    profile: &SusceptibilityProfile,
    classification: &Classification,
) -> MechanismFinding {
    if !is_ampc_prone(classification) {
        return MechanismFinding::not_suspected(Mechanism::AmpC, AMPC_PATTERN);
    }
    let panel: Vec<Antibiotic> = THIRD_GENERATION_CEPHALOSPORINS
        .into_iter()
        .chain(FIRST_GENERATION_CEPHALOSPORINS_AND_CEPHAMYCINS)
        .collect();
    let resistant = matching(profile, &panel, SusceptibilityCall::Resistant);
    let active = matching(profile, &CARBAPENEMS, SusceptibilityCall::Susceptible);
    if resistant.is_empty() || active.is_empty() {
        return MechanismFinding::not_suspected(Mechanism::AmpC, AMPC_PATTERN);
    }
    suspected(
        Mechanism::AmpC,
        AMPC_PATTERN,
        1.0,
        resistant.into_iter().chain(active).collect(),
        "Third-generation cephalosporins may fail on therapy through AmpC derepression; prefer cefepime if susceptible, or a carbapenem.",
    )
}

/// Confidence is the resistant fraction of the carbapenem panel.
pub fn detect_carbapenemase(profile: &SusceptibilityProfile) -> MechanismFinding {
    let resistant = matching(profile, &CARBAPENEMS, SusceptibilityCall::Resistant);
    if resistant.is_empty() {
        return MechanismFinding::not_suspected(Mechanism::Carbapenemase, CARBAPENEMASE_PATTERN);
    }
    let confidence = resistant.len() as f64 / CARBAPENEMS.len() as f64;
    suspected(
        Mechanism::Carbapenemase,
        CARBAPENEMASE_PATTERN,
        confidence,
        resistant,
        "Carbapenem resistance: use a carbapenemase-active agent (e.g. ceftazidime-avibactam), request carbapenemase testing and apply contact precautions.",
    )
}

pub fn detect_mrsa(profile: &SusceptibilityProfile, category: OrganismCategory) -> MechanismFinding {
    let resistant = matching(
        profile,
        &[Antibiotic::Oxacillin, Antibiotic::Cefoxitin],
        SusceptibilityCall::Resistant,
    );
    if category != OrganismCategory::Staphylococcus || resistant.is_empty() {
        return MechanismFinding::not_suspected(Mechanism::Mrsa, MRSA_PATTERN);
    }
    suspected(
        Mechanism::Mrsa,
        MRSA_PATTERN,
        1.0,
        resistant,
        "Resistant to all beta-lactams except ceftaroline; use vancomycin, daptomycin or linezolid.",
    )
}

pub fn detect_vre(profile: &SusceptibilityProfile, category: OrganismCategory) -> MechanismFinding {
    if category != OrganismCategory::Enterococcus || !profile.is_resistant(Antibiotic::Vancomycin) {
        return MechanismFinding::not_suspected(Mechanism::Vre, VRE_PATTERN);
    }
    suspected(
        Mechanism::Vre,
        VRE_PATTERN,
        1.0,
        vec![Antibiotic::Vancomycin],
        "Use linezolid or daptomycin; apply contact precautions.",
    )
}

/// Run every detector against one case.
pub fn detect(profile: &SusceptibilityProfile, classification: &Classification) -> MechanismReport {
    let category = classification.category;
    let mut report = MechanismReport {
        esbl: detect_esbl(profile),
        amp_c: detect_ampc(profile, classification),
        carbapenemase: detect_carbapenemase(profile),
        mrsa: detect_mrsa(profile, category),
        vre: detect_vre(profile, category),
        summary: String::new(),
    };
    report.summary = summarize(&report);
    report
}

fn summarize(report: &MechanismReport) -> String {
    let found: Vec<String> = report
        .findings()
        .iter()
        .filter(|f| f.suspected)
        .map(|f| format!("{} (confidence {:.2})", f.mechanism.label(), f.confidence))
        .collect();
    if found.is_empty() {
        "No resistance mechanism suspected.".to_string()
    } else {
        format!("Suspected: {}.", found.join("; "))
    }
}
