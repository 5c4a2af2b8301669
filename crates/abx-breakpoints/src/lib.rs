//! abx-breakpoints
//!
//! The breakpoint knowledge base and everything that reads it: organism
//! classification, measurement parsing, and MIC / disk-diffusion
//! interpretation. All lookups are pure functions over an immutable
//! [`catalog::BreakpointCatalog`].

pub mod catalog;
pub mod classifier;
pub mod comparator;
pub mod error;
pub mod measurement;
pub mod schema;
pub mod source;
