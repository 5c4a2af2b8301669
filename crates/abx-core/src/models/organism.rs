use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A cluster of organisms sharing one breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrganismCategory {
    Enterobacterales,
    Pseudomonas,
    Acinetobacter,
    Stenotrophomonas,
    Staphylococcus,
    Enterococcus,
    StreptococcusPneumoniae,
    BetaHemolyticStreptococci,
    ViridansStreptococci,
    Haemophilus,
    Anaerobes,
    /// Organisms without a dedicated table. Interpretation degrades to NA
    /// instead of failing.
    Other,
}

impl OrganismCategory {
    pub const ALL: [OrganismCategory; 12] = [
        Self::Enterobacterales,
        Self::Pseudomonas,
        Self::Acinetobacter,
        Self::Stenotrophomonas,
        Self::Staphylococcus,
        Self::Enterococcus,
        Self::StreptococcusPneumoniae,
        Self::BetaHemolyticStreptococci,
        Self::ViridansStreptococci,
        Self::Haemophilus,
        Self::Anaerobes,
        Self::Other,
    ];

    /// Snake-case key, identical to the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Self::Enterobacterales => "enterobacterales",
            Self::Pseudomonas => "pseudomonas",
            Self::Acinetobacter => "acinetobacter",
            Self::Stenotrophomonas => "stenotrophomonas",
            Self::Staphylococcus => "staphylococcus",
            Self::Enterococcus => "enterococcus",
            Self::StreptococcusPneumoniae => "streptococcus_pneumoniae",
            Self::BetaHemolyticStreptococci => "beta_hemolytic_streptococci",
            Self::ViridansStreptococci => "viridans_streptococci",
            Self::Haemophilus => "haemophilus",
            Self::Anaerobes => "anaerobes",
            Self::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Enterobacterales => "Enterobacterales",
            Self::Pseudomonas => "Pseudomonas aeruginosa",
            Self::Acinetobacter => "Acinetobacter spp.",
            Self::Stenotrophomonas => "Stenotrophomonas maltophilia",
            Self::Staphylococcus => "Staphylococcus spp.",
            Self::Enterococcus => "Enterococcus spp.",
            Self::StreptococcusPneumoniae => "Streptococcus pneumoniae",
            Self::BetaHemolyticStreptococci => "Beta-hemolytic streptococci",
            Self::ViridansStreptococci => "Viridans group streptococci",
            Self::Haemophilus => "Haemophilus spp.",
            Self::Anaerobes => "Anaerobes",
            Self::Other => "Other non-enumerated organisms",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }
}

impl fmt::Display for OrganismCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
