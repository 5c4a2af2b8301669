use thiserror::Error;

use abx_breakpoints::error::KnowledgeBaseError;
use abx_core::error::CoreError;

#[derive(Debug, Error)]
pub enum RegimenError {
    #[error(transparent)]
    Source(#[from] KnowledgeBaseError),

    #[error("regimen knowledge base is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("regimen '{id}' is declared more than once")]
    DuplicateRegimen { id: String },

    #[error("regimen '{id}' has no organism key")]
    MissingOrganism { id: String },

    #[error("regimen '{id}' lists no drug options")]
    EmptyRegimen { id: String },

    #[error("regimen '{regimen}': unknown antibiotic '{name}'")]
    UnknownAntibiotic { regimen: String, name: String },

    #[error("regimen '{regimen}': antibiotic '{antibiotic}' is listed more than once")]
    DuplicateOption { regimen: String, antibiotic: String },

    #[error("invalid case input: {0}")]
    InvalidInput(#[from] CoreError),

    #[error("embedded regimen knowledge base failed validation: {0}")]
    Embedded(String),
}
