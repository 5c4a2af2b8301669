//! abx-engine
//!
//! Public entry point of the decision engine. [`Engine`] holds the two
//! knowledge bases and a telemetry sink, and runs the per-case pipeline:
//! classify, interpret the panel, detect mechanisms, assess severity and
//! epidemiology, then select a regimen.

pub mod engine;
pub mod error;
pub mod report;
pub mod request;

pub use engine::Engine;
pub use error::EngineError;
pub use report::CaseReport;
pub use request::{CaseRequest, ResultMethod, SusceptibilityInput};
