use thiserror::Error;

use abx_core::models::organism::OrganismCategory;

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base from {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("knowledge base is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("category '{0}' is declared more than once")]
    DuplicateCategory(OrganismCategory),

    #[error("organism identifier '{identifier}' is declared more than once")]
    DuplicateOrganism { identifier: String },

    #[error("{category}: unknown antibiotic '{name}'")]
    UnknownAntibiotic {
        category: OrganismCategory,
        name: String,
    },

    #[error("{category}/{antibiotic}: duplicate breakpoint set for site '{site}'")]
    DuplicateBreakpoint {
        category: OrganismCategory,
        antibiotic: String,
        site: String,
    },

    #[error("{category}/{antibiotic}: {field} boundary '{value}' is not a valid measurement")]
    InvalidBoundary {
        category: OrganismCategory,
        antibiotic: String,
        field: &'static str,
        value: String,
    },

    #[error("{category}/{antibiotic}: neither a susceptible nor a resistant boundary is declared")]
    MissingBoundaries {
        category: OrganismCategory,
        antibiotic: String,
    },

    #[error("{category}/{antibiotic}: boundaries out of order ({detail})")]
    OutOfOrder {
        category: OrganismCategory,
        antibiotic: String,
        detail: String,
    },

    #[error("{category}/{antibiotic}: tier {tier} is outside 1..=4")]
    InvalidTier {
        category: OrganismCategory,
        antibiotic: String,
        tier: u8,
    },

    #[error("embedded knowledge base failed validation: {0}")]
    Embedded(String),
}
