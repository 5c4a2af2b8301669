use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown antibiotic: {0}")]
    UnknownAntibiotic(String),

    #[error("unknown infection syndrome: {0}")]
    UnknownSyndrome(String),

    #[error("invalid resistance rate for {field}: {value} (expected a fraction in [0, 1])")]
    InvalidRate { field: String, value: f64 },
}
