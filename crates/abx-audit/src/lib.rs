//! abx-audit
//!
//! Telemetry seam for the decision engine. Domain code stays side-effect
//! free; the engine reports degraded paths and decisions as [`EngineEvent`]s
//! through an injected [`Telemetry`] sink.

pub mod events;
pub mod telemetry;

pub use events::EngineEvent;
pub use telemetry::{NoopTelemetry, RecordingTelemetry, Telemetry, TracingTelemetry};
