//! On-disk shape of the breakpoint knowledge base. These records are only
//! ever read by [`crate::catalog::BreakpointCatalog`], which validates them
//! and turns them into typed tables.

use serde::{Deserialize, Serialize};

use abx_core::models::case::InfectionSite;
use abx_core::models::organism::OrganismCategory;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub version: String,
    pub standard: String,
    pub published: jiff::civil::Date,
    pub categories: Vec<CategoryRecord>,
}

/// Just enough of a document to key the cache.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionProbe {
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category: OrganismCategory,
    #[serde(default)]
    pub intrinsic_resistance: Vec<String>,
    #[serde(default)]
    pub organisms: Vec<OrganismRecord>,
    #[serde(default)]
    pub breakpoints: Vec<BreakpointRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganismRecord {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub intrinsic_resistance: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakpointRecord {
    pub antibiotic: String,
    /// Absent for the routine set.
    #[serde(default)]
    pub site: Option<InfectionSite>,
    #[serde(default)]
    pub susceptible: Option<String>,
    #[serde(default)]
    pub sdd: Option<String>,
    #[serde(default)]
    pub intermediate: Option<String>,
    #[serde(default)]
    pub resistant: Option<String>,
    #[serde(default)]
    pub disk: Option<DiskRecord>,
    #[serde(default)]
    pub condition: Option<String>,
    pub tier: u8,
}

/// Zone-diameter breakpoints in millimetres.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskRecord {
    #[serde(default)]
    pub susceptible: Option<String>,
    #[serde(default)]
    pub intermediate: Option<String>,
    #[serde(default)]
    pub resistant: Option<String>,
}
