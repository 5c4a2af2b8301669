use std::io::Write;
use std::sync::Arc;

use abx_breakpoints::catalog::{BreakpointCatalog, CatalogCache};
use abx_breakpoints::error::KnowledgeBaseError;
use abx_breakpoints::source::{EmbeddedSource, FileSource};
use abx_core::models::antibiotic::Antibiotic;
use abx_core::models::case::InfectionSite;
use abx_core::models::organism::OrganismCategory;

fn minimal(breakpoints: &str) -> String {
    format!(
        r#"{{
            "version": "test-1",
            "standard": "unit",
            "published": "2024-01-01",
            "categories": [
                {{
                    "category": "enterobacterales",
                    "intrinsic_resistance": ["vancomycin"],
                    "organisms": [{{ "id": "escherichia_coli", "aliases": ["e_coli"] }}],
                    "breakpoints": [{breakpoints}]
                }}
            ]
        }}"#
    )
}

#[test]
fn embedded_catalog_loads_and_covers_every_category() {
    let catalog = BreakpointCatalog::embedded().unwrap();
    for category in OrganismCategory::ALL {
        assert!(catalog.table(category).is_some(), "missing {category:?}");
    }
    assert_eq!(catalog.published.year(), 2024);
}

#[test]
fn embedded_catalog_is_shared() {
    let a = BreakpointCatalog::embedded().unwrap();
    let b = BreakpointCatalog::embedded().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn site_specific_set_replaces_routine_set() {
    let catalog = BreakpointCatalog::embedded().unwrap();
    let routine = catalog
        .breakpoints(OrganismCategory::StreptococcusPneumoniae, Antibiotic::Penicillin, None)
        .unwrap();
    assert_eq!(routine.site_override, None);
    assert_eq!(routine.set.susceptible.as_ref().unwrap().value, 2.0);

    let meningitis = catalog
        .breakpoints(
            OrganismCategory::StreptococcusPneumoniae,
            Antibiotic::Penicillin,
            Some(InfectionSite::Meningitis),
        )
        .unwrap();
    assert_eq!(meningitis.site_override, Some(InfectionSite::Meningitis));
    assert_eq!(meningitis.set.susceptible.as_ref().unwrap().value, 0.06);

    // No override for this site: the routine set is used.
    let bloodstream = catalog
        .breakpoints(
            OrganismCategory::StreptococcusPneumoniae,
            Antibiotic::Penicillin,
            Some(InfectionSite::Bloodstream),
        )
        .unwrap();
    assert_eq!(bloodstream.site_override, None);
}

#[test]
fn organism_intrinsic_list_is_unioned_with_category_list() {
    let catalog = BreakpointCatalog::embedded().unwrap();
    let category = OrganismCategory::Enterobacterales;

    assert!(catalog.is_intrinsically_resistant(category, None, Antibiotic::Vancomycin));
    assert!(!catalog.is_intrinsically_resistant(category, None, Antibiotic::Ampicillin));
    assert!(catalog.is_intrinsically_resistant(
        category,
        Some("klebsiella_pneumoniae"),
        Antibiotic::Ampicillin
    ));
    assert!(!catalog.is_intrinsically_resistant(
        category,
        Some("escherichia_coli"),
        Antibiotic::Ampicillin
    ));
}

#[test]
fn aliases_resolve_to_the_canonical_organism() {
    let catalog = BreakpointCatalog::embedded().unwrap();
    let entry = catalog.organism("e_coli").unwrap();
    assert_eq!(entry.id, "escherichia_coli");
    assert_eq!(entry.genus(), "escherichia");
}

#[test]
fn loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        minimal(r#"{ "antibiotic": "ceftriaxone", "susceptible": "≤1", "resistant": "≥4", "tier": 1 }"#)
            .as_bytes(),
    )
    .unwrap();

    let catalog = BreakpointCatalog::load(&FileSource::new(file.path())).unwrap();
    assert_eq!(catalog.version, "test-1");
    assert!(
        catalog
            .breakpoints(OrganismCategory::Enterobacterales, Antibiotic::Ceftriaxone, None)
            .is_some()
    );
}

#[test]
fn missing_file_reports_its_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = BreakpointCatalog::load(&FileSource::new(&path)).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn cache_returns_the_same_instance_for_the_same_version() {
    let cache = CatalogCache::new();
    assert!(cache.is_empty());

    let first = cache.load(&EmbeddedSource).unwrap();
    let second = cache.load(&EmbeddedSource).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        minimal(r#"{ "antibiotic": "ceftriaxone", "susceptible": "≤1", "resistant": "≥4", "tier": 1 }"#)
            .as_bytes(),
    )
    .unwrap();
    cache.load(&FileSource::new(file.path())).unwrap();
    assert_eq!(cache.len(), 2);
}

#[test]
fn rejects_susceptible_not_below_resistant() {
    let text = minimal(r#"{ "antibiotic": "ceftriaxone", "susceptible": "≤4", "resistant": "≥4", "tier": 1 }"#);
    let err = BreakpointCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::OutOfOrder { .. }));
}

#[test]
fn rejects_intermediate_outside_boundaries() {
    let text = minimal(
        r#"{ "antibiotic": "ceftriaxone", "susceptible": "≤1", "intermediate": "2-8", "resistant": "≥4", "tier": 1 }"#,
    );
    let err = BreakpointCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::OutOfOrder { .. }));
}

#[test]
fn rejects_unknown_antibiotic() {
    let text = minimal(r#"{ "antibiotic": "unobtainium", "susceptible": "≤1", "tier": 1 }"#);
    let err = BreakpointCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::UnknownAntibiotic { .. }));
}

#[test]
fn rejects_set_without_boundaries() {
    let text = minimal(r#"{ "antibiotic": "ceftriaxone", "intermediate": "2", "tier": 1 }"#);
    let err = BreakpointCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::MissingBoundaries { .. }));
}

#[test]
fn rejects_unreadable_boundary() {
    let text = minimal(r#"{ "antibiotic": "ceftriaxone", "susceptible": "low", "resistant": "≥4", "tier": 1 }"#);
    let err = BreakpointCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::InvalidBoundary { field: "susceptible", .. }));
}

#[test]
fn rejects_tier_out_of_range() {
    let text = minimal(r#"{ "antibiotic": "ceftriaxone", "susceptible": "≤1", "resistant": "≥4", "tier": 7 }"#);
    let err = BreakpointCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::InvalidTier { tier: 7, .. }));
}

#[test]
fn rejects_duplicate_routine_sets() {
    let text = minimal(
        r#"{ "antibiotic": "ceftriaxone", "susceptible": "≤1", "resistant": "≥4", "tier": 1 },
           { "antibiotic": "CRO", "susceptible": "≤1", "resistant": "≥4", "tier": 1 }"#,
    );
    let err = BreakpointCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::DuplicateBreakpoint { .. }));
}

#[test]
fn rejects_inverted_disk_boundaries() {
    let text = minimal(
        r#"{ "antibiotic": "ceftriaxone", "susceptible": "≤1", "resistant": "≥4", "tier": 1,
             "disk": { "susceptible": "≥19", "resistant": "≤23" } }"#,
    );
    let err = BreakpointCatalog::from_json(&text).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::OutOfOrder { .. }));
}

#[test]
fn rejects_malformed_json() {
    let err = BreakpointCatalog::from_json("{ not json").unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::Parse(_)));
}
