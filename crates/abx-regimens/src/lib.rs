//! abx-regimens
//!
//! Everything downstream of the per-drug calls: resistance mechanism
//! detection, severity and epidemiology assessment, the treatment regimen
//! knowledge base, and the rule-based regimen scorer and selector.
//!
//! Like the breakpoint crate, every decision function here is pure. Callers
//! that want telemetry (see `abx-engine`) derive it from the returned values.

pub mod allergy;
pub mod catalog;
pub mod epidemiology;
pub mod error;
pub mod mechanisms;
pub mod penetration;
pub mod schema;
pub mod scope;
pub mod scoring;
pub mod selection;
pub mod severity;
