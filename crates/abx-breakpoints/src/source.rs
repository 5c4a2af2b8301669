//! Where knowledge-base text comes from.

use std::path::PathBuf;

use crate::error::KnowledgeBaseError;

/// The breakpoint data set shipped with the crate.
pub const EMBEDDED_BREAKPOINTS: &str = include_str!("../data/clsi_m100.json");

/// A loader for knowledge-base documents.
pub trait KnowledgeSource: Send + Sync {
    /// Human-readable location, used in error messages and logs.
    fn location(&self) -> String;

    fn read(&self) -> Result<String, KnowledgeBaseError>;
}

/// The data set compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl KnowledgeSource for EmbeddedSource {
    fn location(&self) -> String {
        "embedded:clsi_m100.json".to_string()
    }

    fn read(&self) -> Result<String, KnowledgeBaseError> {
        Ok(EMBEDDED_BREAKPOINTS.to_string())
    }
}

/// A JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KnowledgeSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<String, KnowledgeBaseError> {
        std::fs::read_to_string(&self.path).map_err(|source| KnowledgeBaseError::Io {
            location: self.location(),
            source,
        })
    }
}
