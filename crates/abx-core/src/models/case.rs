use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::normalize_key;

/// Clinical syndrome being treated. Drives the severity baseline, the
/// tissue-penetration profile and the body site used for breakpoint
/// overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InfectionSyndrome {
    #[serde(alias = "cystitis")]
    UncomplicatedUti,
    ComplicatedUti,
    Pyelonephritis,
    #[serde(alias = "cap")]
    CommunityAcquiredPneumonia,
    #[serde(alias = "hap")]
    HospitalAcquiredPneumonia,
    #[serde(alias = "vap")]
    VentilatorAssociatedPneumonia,
    Bacteremia,
    Endocarditis,
    IntraAbdominal,
    #[serde(alias = "ssti")]
    SkinSoftTissue,
    NecrotizingSoftTissue,
    Osteomyelitis,
    SepticArthritis,
    #[serde(alias = "CNS_meningitis", alias = "meningitis")]
    CnsMeningitis,
    FebrileNeutropenia,
    #[default]
    Other,
}

impl InfectionSyndrome {
    pub const ALL: [InfectionSyndrome; 16] = [
        Self::UncomplicatedUti,
        Self::ComplicatedUti,
        Self::Pyelonephritis,
        Self::CommunityAcquiredPneumonia,
        Self::HospitalAcquiredPneumonia,
        Self::VentilatorAssociatedPneumonia,
        Self::Bacteremia,
        Self::Endocarditis,
        Self::IntraAbdominal,
        Self::SkinSoftTissue,
        Self::NecrotizingSoftTissue,
        Self::Osteomyelitis,
        Self::SepticArthritis,
        Self::CnsMeningitis,
        Self::FebrileNeutropenia,
        Self::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::UncomplicatedUti => "uncomplicated_uti",
            Self::ComplicatedUti => "complicated_uti",
            Self::Pyelonephritis => "pyelonephritis",
            Self::CommunityAcquiredPneumonia => "community_acquired_pneumonia",
            Self::HospitalAcquiredPneumonia => "hospital_acquired_pneumonia",
            Self::VentilatorAssociatedPneumonia => "ventilator_associated_pneumonia",
            Self::Bacteremia => "bacteremia",
            Self::Endocarditis => "endocarditis",
            Self::IntraAbdominal => "intra_abdominal",
            Self::SkinSoftTissue => "skin_soft_tissue",
            Self::NecrotizingSoftTissue => "necrotizing_soft_tissue",
            Self::Osteomyelitis => "osteomyelitis",
            Self::SepticArthritis => "septic_arthritis",
            Self::CnsMeningitis => "cns_meningitis",
            Self::FebrileNeutropenia => "febrile_neutropenia",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UncomplicatedUti => "uncomplicated urinary tract infection",
            Self::ComplicatedUti => "complicated urinary tract infection",
            Self::Pyelonephritis => "pyelonephritis",
            Self::CommunityAcquiredPneumonia => "community-acquired pneumonia",
            Self::HospitalAcquiredPneumonia => "hospital-acquired pneumonia",
            Self::VentilatorAssociatedPneumonia => "ventilator-associated pneumonia",
            Self::Bacteremia => "bacteremia",
            Self::Endocarditis => "endocarditis",
            Self::IntraAbdominal => "intra-abdominal infection",
            Self::SkinSoftTissue => "skin and soft tissue infection",
            Self::NecrotizingSoftTissue => "necrotizing soft tissue infection",
            Self::Osteomyelitis => "osteomyelitis",
            Self::SepticArthritis => "septic arthritis",
            Self::CnsMeningitis => "CNS infection / meningitis",
            Self::FebrileNeutropenia => "febrile neutropenia",
            Self::Other => "unspecified infection",
        }
    }

    /// Body site whose breakpoints apply, if it differs from the routine set.
    pub fn site(self) -> InfectionSite {
        match self {
            Self::UncomplicatedUti => InfectionSite::UncomplicatedUrinaryTract,
            Self::ComplicatedUti | Self::Pyelonephritis => InfectionSite::UrinaryTract,
            Self::CommunityAcquiredPneumonia
            | Self::HospitalAcquiredPneumonia
            | Self::VentilatorAssociatedPneumonia => InfectionSite::Respiratory,
            Self::Bacteremia | Self::Endocarditis | Self::FebrileNeutropenia => {
                InfectionSite::Bloodstream
            }
            Self::IntraAbdominal => InfectionSite::IntraAbdominal,
            Self::SkinSoftTissue | Self::NecrotizingSoftTissue => InfectionSite::SkinSoftTissue,
            Self::Osteomyelitis | Self::SepticArthritis => InfectionSite::BoneJoint,
            Self::CnsMeningitis => InfectionSite::Meningitis,
            Self::Other => InfectionSite::Other,
        }
    }
}

impl fmt::Display for InfectionSyndrome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InfectionSyndrome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s, '_');
        let syndrome = match key.as_str() {
            "cystitis" => Self::UncomplicatedUti,
            "cap" => Self::CommunityAcquiredPneumonia,
            "hap" => Self::HospitalAcquiredPneumonia,
            "vap" => Self::VentilatorAssociatedPneumonia,
            "ssti" => Self::SkinSoftTissue,
            "meningitis" | "cns" => Self::CnsMeningitis,
            other => Self::ALL
                .iter()
                .copied()
                .find(|s| s.key() == other)
                .ok_or_else(|| CoreError::UnknownSyndrome(s.to_string()))?,
        };
        Ok(syndrome)
    }
}

/// Body site used to select site-specific breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InfectionSite {
    Meningitis,
    UncomplicatedUrinaryTract,
    UrinaryTract,
    Respiratory,
    Bloodstream,
    IntraAbdominal,
    SkinSoftTissue,
    BoneJoint,
    Other,
}

impl InfectionSite {
    pub fn label(self) -> &'static str {
        match self {
            Self::Meningitis => "meningitis",
            Self::UncomplicatedUrinaryTract => "uncomplicated urinary tract",
            Self::UrinaryTract => "urinary tract",
            Self::Respiratory => "respiratory",
            Self::Bloodstream => "bloodstream",
            Self::IntraAbdominal => "intra-abdominal",
            Self::SkinSoftTissue => "skin and soft tissue",
            Self::BoneJoint => "bone and joint",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for InfectionSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum HemodynamicStatus {
    #[default]
    Stable,
    Hypotension,
    Shock,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RespiratorySupport {
    #[default]
    RoomAir,
    SupplementalOxygen,
    MechanicalVentilation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InstitutionType {
    #[default]
    Community,
    Tertiary,
    LongTermCare,
}

impl InstitutionType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Community => "community hospital",
            Self::Tertiary => "tertiary care centre",
            Self::LongTermCare => "long-term care facility",
        }
    }
}

/// Local resistance-rate overrides for the case organism's genus. Rates are
/// fractions in `[0, 1]`; absent fields fall back to the built-in defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LocalResistanceRates {
    #[serde(default)]
    pub esbl_rate: Option<f64>,
    #[serde(default)]
    pub carbapenem_resistance_rate: Option<f64>,
    #[serde(default)]
    pub institution_type: Option<InstitutionType>,
}

impl LocalResistanceRates {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, rate) in [
            ("esbl_rate", self.esbl_rate),
            ("carbapenem_resistance_rate", self.carbapenem_resistance_rate),
        ] {
            if let Some(value) = rate
                && !(0.0..=1.0).contains(&value)
            {
                return Err(CoreError::InvalidRate {
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Patient and clinical-context attributes for one case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct CaseContext {
    pub syndrome: InfectionSyndrome,
    pub age_years: Option<u32>,
    pub is_icu: bool,
    pub is_immunocompromised: bool,
    pub prior_antibiotic_exposure: bool,
    pub has_organ_dysfunction: bool,
    /// Sepsis or septic shock.
    pub has_sepsis: bool,
    pub hemodynamics: HemodynamicStatus,
    pub respiratory_support: RespiratorySupport,
    /// Drug or drug-class names the patient is allergic to.
    pub allergies: Vec<String>,
    pub local_rates: Option<LocalResistanceRates>,
}
