use thiserror::Error;

use abx_breakpoints::error::KnowledgeBaseError;
use abx_regimens::error::RegimenError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("breakpoint knowledge base: {0}")]
    Breakpoints(#[from] KnowledgeBaseError),

    #[error("regimen knowledge base: {0}")]
    Regimens(#[from] RegimenError),
}
