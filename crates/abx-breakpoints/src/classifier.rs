//! Organism identifier → breakpoint category.
//!
//! Resolution is two-stage with fixed precedence:
//!
//! 1. exact match of the normalized identifier against the organisms (and
//!    their aliases) declared in the catalog;
//! 2. the first fragment in [`FRAGMENTS`] contained in the identifier.
//!
//! Anything else lands in [`OrganismCategory::Other`] with low confidence.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use abx_core::models::assessment::Confidence;
use abx_core::models::organism::OrganismCategory;
use abx_core::normalize_key;

use crate::catalog::BreakpointCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MatchMethod {
    Exact,
    Pattern,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Classification {
    pub input: String,
    pub normalized: String,
    pub category: OrganismCategory,
    /// Catalog identifier, only for exact matches.
    pub organism_id: Option<String>,
    pub genus: Option<String>,
    pub method: MatchMethod,
    pub matched_fragment: Option<String>,
    pub confidence: Confidence,
}

impl Classification {
    /// The identifier to use for organism-level lookups: the catalog id when
    /// known, else the normalized input.
    pub fn organism_key(&self) -> &str {
        self.organism_id.as_deref().unwrap_or(&self.normalized)
    }

    pub fn is_fallback(&self) -> bool {
        self.method == MatchMethod::Fallback
    }
}

/// Ordered fragment table. Earlier entries win, so more specific fragments
/// must precede the ones they contain (`peptostreptococcus` before
/// `streptococcus`, `streptococcus_pneumoniae` before `streptococcus`).
pub const FRAGMENTS: &[(&str, OrganismCategory)] = &[
    ("escherichia", OrganismCategory::Enterobacterales),
    ("e_coli", OrganismCategory::Enterobacterales),
    ("klebsiella", OrganismCategory::Enterobacterales),
    ("enterobacter", OrganismCategory::Enterobacterales),
    ("citrobacter", OrganismCategory::Enterobacterales),
    ("serratia", OrganismCategory::Enterobacterales),
    ("proteus", OrganismCategory::Enterobacterales),
    ("morganella", OrganismCategory::Enterobacterales),
    ("providencia", OrganismCategory::Enterobacterales),
    ("salmonella", OrganismCategory::Enterobacterales),
    ("shigella", OrganismCategory::Enterobacterales),
    ("hafnia", OrganismCategory::Enterobacterales),
    ("raoultella", OrganismCategory::Enterobacterales),
    ("cronobacter", OrganismCategory::Enterobacterales),
    ("yersinia", OrganismCategory::Enterobacterales),
    ("coliform", OrganismCategory::Enterobacterales),
    ("stenotrophomonas", OrganismCategory::Stenotrophomonas),
    ("pseudomonas", OrganismCategory::Pseudomonas),
    ("acinetobacter", OrganismCategory::Acinetobacter),
    ("bacteroides", OrganismCategory::Anaerobes),
    ("clostridioides", OrganismCategory::Anaerobes),
    ("clostridium", OrganismCategory::Anaerobes),
    ("prevotella", OrganismCategory::Anaerobes),
    ("fusobacterium", OrganismCategory::Anaerobes),
    ("peptostreptococcus", OrganismCategory::Anaerobes),
    ("cutibacterium", OrganismCategory::Anaerobes),
    ("staph", OrganismCategory::Staphylococcus),
    ("mrsa", OrganismCategory::Staphylococcus),
    ("mssa", OrganismCategory::Staphylococcus),
    ("enterococcus", OrganismCategory::Enterococcus),
    ("vre", OrganismCategory::Enterococcus),
    ("streptococcus_pneumoniae", OrganismCategory::StreptococcusPneumoniae),
    ("pneumococc", OrganismCategory::StreptococcusPneumoniae),
    ("streptococcus_pyogenes", OrganismCategory::BetaHemolyticStreptococci),
    ("streptococcus_agalactiae", OrganismCategory::BetaHemolyticStreptococci),
    ("streptococcus_dysgalactiae", OrganismCategory::BetaHemolyticStreptococci),
    ("group_a_strep", OrganismCategory::BetaHemolyticStreptococci),
    ("group_b_strep", OrganismCategory::BetaHemolyticStreptococci),
    ("beta_hemolytic", OrganismCategory::BetaHemolyticStreptococci),
    ("streptococcus", OrganismCategory::ViridansStreptococci),
    ("haemophilus", OrganismCategory::Haemophilus),
    ("hemophilus", OrganismCategory::Haemophilus),
];

/// Classify a free-form organism identifier. Never fails.
pub fn classify(catalog: &BreakpointCatalog, identifier: &str) -> Classification {
    let normalized = normalize_key(identifier, '_');

    if let Some(entry) = catalog.organism(&normalized) {
        return Classification {
            input: identifier.to_string(),
            normalized: normalized.clone(),
            category: entry.category,
            organism_id: Some(entry.id.clone()),
            genus: Some(entry.genus().to_string()),
            method: MatchMethod::Exact,
            matched_fragment: None,
            confidence: Confidence::High,
        };
    }

    let genus = normalized
        .split('_')
        .next()
        .filter(|g| !g.is_empty())
        .map(str::to_string);

    if let Some((fragment, category)) = FRAGMENTS
        .iter()
        .find(|(fragment, _)| normalized.contains(fragment))
    {
        return Classification {
            input: identifier.to_string(),
            normalized,
            category: *category,
            organism_id: None,
            genus,
            method: MatchMethod::Pattern,
            matched_fragment: Some(fragment.to_string()),
            confidence: Confidence::Moderate,
        };
    }

    Classification {
        input: identifier.to_string(),
        normalized,
        category: OrganismCategory::Other,
        organism_id: None,
        genus,
        method: MatchMethod::Fallback,
        matched_fragment: None,
        confidence: Confidence::Low,
    }
}
