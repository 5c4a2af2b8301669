//! Additive severity score with an itemized audit trail.

use abx_core::models::assessment::{ScoreFactor, SeverityAssessment, SeverityLevel};
use abx_core::models::case::{CaseContext, HemodynamicStatus, InfectionSyndrome, RespiratorySupport};

pub fn syndrome_baseline(syndrome: InfectionSyndrome) -> i32 {
    use InfectionSyndrome::*;
    match syndrome {
        UncomplicatedUti | SkinSoftTissue | Other => 1,
        ComplicatedUti
        | Pyelonephritis
        | CommunityAcquiredPneumonia
        | HospitalAcquiredPneumonia
        | Bacteremia
        | IntraAbdominal
        | Osteomyelitis
        | SepticArthritis => 2,
        VentilatorAssociatedPneumonia
        | Endocarditis
        | NecrotizingSoftTissue
        | CnsMeningitis
        | FebrileNeutropenia => 3,
    }
}

pub fn assess_severity(case: &CaseContext) -> SeverityAssessment {
    let mut factors = vec![ScoreFactor::new(
        format!("{} baseline", case.syndrome.label()),
        syndrome_baseline(case.syndrome),
    )];

    let flags = [
        (case.age_years.is_some_and(|age| age > 65), "age over 65", 1),
        (case.is_icu, "ICU admission", 3),
        (case.is_immunocompromised, "immunocompromised", 2),
        (case.prior_antibiotic_exposure, "prior antibiotic exposure", 1),
        (case.has_organ_dysfunction, "organ dysfunction", 2),
        (case.has_sepsis, "sepsis", 3),
    ];
    factors.extend(
        flags
            .into_iter()
            .filter(|(applies, _, _)| *applies)
            .map(|(_, label, points)| ScoreFactor::new(label, points)),
    );

    match case.hemodynamics {
        HemodynamicStatus::Shock => factors.push(ScoreFactor::new("shock", 3)),
        HemodynamicStatus::Hypotension => factors.push(ScoreFactor::new("hypotension", 2)),
        HemodynamicStatus::Stable => {}
    }
    match case.respiratory_support {
        RespiratorySupport::MechanicalVentilation => {
            factors.push(ScoreFactor::new("mechanical ventilation", 2))
        }
        RespiratorySupport::SupplementalOxygen => {
            factors.push(ScoreFactor::new("supplemental oxygen", 1))
        }
        RespiratorySupport::RoomAir => {}
    }

    let score = factors.iter().map(|f| f.points).sum();
    SeverityAssessment {
        score,
        level: SeverityLevel::from_score(score),
        factors,
    }
}
