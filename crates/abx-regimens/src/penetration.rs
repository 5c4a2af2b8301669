//! Site-specific tissue penetration. Each infection site has a profile of
//! drug-level and class-level entries; anything not listed is `Good`.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use abx_core::models::antibiotic::{Antibiotic, DrugClass};
use abx_core::models::case::InfectionSite;

use Antibiotic as A;
use DrugClass as C;
use Penetration::*;

/// Ordered best first, so sorting ascending ranks better penetration first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Penetration {
    Excellent,
    Good,
    Moderate,
    Poor,
    Avoid,
}

impl Penetration {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
            Self::Avoid => "avoid",
        }
    }
}

impl fmt::Display for Penetration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct Profile {
    drugs: &'static [(Antibiotic, Penetration)],
    classes: &'static [(DrugClass, Penetration)],
}

const URINARY_ONLY: &[(Antibiotic, Penetration)] = &[(A::Nitrofurantoin, Avoid), (A::Fosfomycin, Avoid)];

static MENINGITIS: Profile = Profile {
    drugs: &[
        (A::Ceftriaxone, Excellent),
        (A::Cefotaxime, Excellent),
        (A::Cefepime, Excellent),
        (A::Meropenem, Excellent),
        (A::Ceftazidime, Good),
        (A::Ampicillin, Good),
        (A::Penicillin, Good),
        (A::Linezolid, Good),
        (A::Metronidazole, Excellent),
        (A::Rifampin, Good),
        (A::Cefazolin, Poor),
        (A::Cefoxitin, Poor),
        (A::Cefuroxime, Poor),
        (A::PiperacillinTazobactam, Poor),
        (A::AmoxicillinClavulanate, Poor),
        (A::Ertapenem, Moderate),
        (A::Doxycycline, Moderate),
        (A::Clindamycin, Avoid),
        (A::Daptomycin, Avoid),
        (A::Tigecycline, Avoid),
        (A::Nitrofurantoin, Avoid),
        (A::Fosfomycin, Avoid),
    ],
    classes: &[
        (C::Aminoglycoside, Poor),
        (C::Macrolide, Poor),
        (C::Polymyxin, Poor),
        (C::Fluoroquinolone, Good),
        (C::FolatePathwayInhibitor, Good),
        (C::Glycopeptide, Moderate),
    ],
};

static UNCOMPLICATED_URINARY: Profile = Profile {
    drugs: &[
        (A::Nitrofurantoin, Excellent),
        (A::Fosfomycin, Excellent),
        (A::TrimethoprimSulfamethoxazole, Excellent),
        (A::Moxifloxacin, Avoid),
        (A::Tigecycline, Avoid),
        (A::Daptomycin, Poor),
        (A::Clindamycin, Poor),
        (A::Doxycycline, Moderate),
    ],
    classes: &[
        (C::Fluoroquinolone, Excellent),
        (C::Macrolide, Poor),
        (C::Oxazolidinone, Moderate),
    ],
};

static URINARY: Profile = Profile {
    drugs: &[
        (A::TrimethoprimSulfamethoxazole, Excellent),
        (A::Ciprofloxacin, Excellent),
        (A::Levofloxacin, Excellent),
        (A::Moxifloxacin, Avoid),
        (A::Tigecycline, Avoid),
        (A::Nitrofurantoin, Avoid),
        (A::Fosfomycin, Poor),
        (A::Clindamycin, Poor),
        (A::Daptomycin, Poor),
    ],
    classes: &[
        (C::Aminoglycoside, Excellent),
        (C::Macrolide, Poor),
        (C::Tetracycline, Moderate),
    ],
};

static RESPIRATORY: Profile = Profile {
    drugs: &[
        (A::Daptomycin, Avoid),
        (A::Levofloxacin, Excellent),
        (A::Moxifloxacin, Excellent),
        (A::Linezolid, Excellent),
        (A::Azithromycin, Excellent),
        (A::Tigecycline, Moderate),
        (A::Nitrofurantoin, Avoid),
        (A::Fosfomycin, Avoid),
    ],
    classes: &[(C::Aminoglycoside, Poor), (C::Polymyxin, Poor), (C::Glycopeptide, Moderate)],
};

static BLOODSTREAM: Profile = Profile {
    drugs: &[
        (A::Tigecycline, Poor),
        (A::Nitrofurantoin, Avoid),
        (A::Fosfomycin, Avoid),
        (A::Daptomycin, Excellent),
        (A::Vancomycin, Excellent),
    ],
    classes: &[
        (C::Penicillin, Excellent),
        (C::Cephalosporin, Excellent),
        (C::Carbapenem, Excellent),
        (C::Macrolide, Moderate),
    ],
};

static INTRA_ABDOMINAL: Profile = Profile {
    drugs: &[
        (A::Metronidazole, Excellent),
        (A::PiperacillinTazobactam, Excellent),
        (A::AmpicillinSulbactam, Good),
        (A::Tigecycline, Good),
        (A::Nitrofurantoin, Avoid),
        (A::Fosfomycin, Avoid),
    ],
    classes: &[(C::Carbapenem, Excellent), (C::Aminoglycoside, Moderate)],
};

static SKIN: Profile = Profile {
    drugs: &[
        (A::Cefazolin, Excellent),
        (A::Clindamycin, Excellent),
        (A::Linezolid, Excellent),
        (A::Doxycycline, Excellent),
        (A::TrimethoprimSulfamethoxazole, Good),
        (A::Nitrofurantoin, Avoid),
        (A::Fosfomycin, Avoid),
    ],
    classes: &[(C::Aminoglycoside, Moderate)],
};

static BONE_JOINT: Profile = Profile {
    drugs: &[
        (A::Rifampin, Excellent),
        (A::Linezolid, Excellent),
        (A::Clindamycin, Excellent),
        (A::TrimethoprimSulfamethoxazole, Good),
        (A::Nitrofurantoin, Avoid),
        (A::Fosfomycin, Avoid),
    ],
    classes: &[(C::Fluoroquinolone, Excellent), (C::Aminoglycoside, Poor)],
};

static OTHER: Profile = Profile {
    drugs: URINARY_ONLY,
    classes: &[],
};

fn profile(site: InfectionSite) -> &'static Profile {
    match site {
        InfectionSite::Meningitis => &MENINGITIS,
        InfectionSite::UncomplicatedUrinaryTract => &UNCOMPLICATED_URINARY,
        InfectionSite::UrinaryTract => &URINARY,
        InfectionSite::Respiratory => &RESPIRATORY,
        InfectionSite::Bloodstream => &BLOODSTREAM,
        InfectionSite::IntraAbdominal => &INTRA_ABDOMINAL,
        InfectionSite::SkinSoftTissue => &SKIN,
        InfectionSite::BoneJoint => &BONE_JOINT,
        InfectionSite::Other => &OTHER,
    }
}

/// Penetration of `antibiotic` at `site`: drug entry, then class entry, then
/// `Good`.
pub fn penetration(site: InfectionSite, antibiotic: Antibiotic) -> Penetration {
    let profile = profile(site);
    profile
        .drugs
        .iter()
        .find(|(drug, _)| *drug == antibiotic)
        .map(|(_, p)| *p)
        .or_else(|| {
            profile
                .classes
                .iter()
                .find(|(class, _)| *class == antibiotic.class())
                .map(|(_, p)| *p)
        })
        .unwrap_or(Good)
}
