//! The treatment regimen knowledge base.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use abx_breakpoints::classifier::Classification;
use abx_breakpoints::source::KnowledgeSource;
use abx_core::models::antibiotic::Antibiotic;
use abx_core::normalize_key;

use crate::error::RegimenError;
use crate::schema::{DrugOptionRecord, RegimenDocument, RegimenRecord};
use crate::scope::{RegimenScope, resolve_scope};

/// The regimen data set shipped with the crate.
pub const EMBEDDED_REGIMENS: &str = include_str!("../data/regimens.json");

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedRegimens;

impl KnowledgeSource for EmbeddedRegimens {
    fn location(&self) -> String {
        "embedded:regimens.json".to_string()
    }

    fn read(&self) -> Result<String, abx_breakpoints::error::KnowledgeBaseError> {
        Ok(EMBEDDED_REGIMENS.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Preference {
    #[default]
    Primary,
    Alternative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DrugOption {
    pub antibiotic: Antibiotic,
    pub dose: String,
    pub route: String,
    pub frequency: String,
    pub preference: Preference,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Regimen {
    pub id: String,
    pub organism: String,
    pub name: String,
    pub condition: String,
    pub population: Option<String>,
    pub infection_source: Option<String>,
    pub primary: bool,
    pub scope: RegimenScope,
    pub options: Vec<DrugOption>,
}

/// Regimens found for an organism, and the key they were found under.
#[derive(Debug, Clone, Copy)]
pub struct Candidates<'a> {
    pub matched_key: &'a str,
    pub regimens: &'a [Regimen],
}

#[derive(Debug, Clone)]
pub struct RegimenCatalog {
    pub version: String,
    pub published: jiff::civil::Date,
    by_organism: BTreeMap<String, Vec<Regimen>>,
}

impl RegimenCatalog {
    pub fn from_json(text: &str) -> Result<Self, RegimenError> {
        let document: RegimenDocument = serde_json::from_str(text)?;
        Self::from_document(document)
    }

    pub fn load(source: &dyn KnowledgeSource) -> Result<Self, RegimenError> {
        let text = source.read()?;
        let catalog = Self::from_json(&text)?;
        info!(
            location = %source.location(),
            version = %catalog.version,
            organisms = catalog.by_organism.len(),
            "loaded regimen catalog"
        );
        Ok(catalog)
    }

    pub fn embedded() -> Result<Arc<Self>, RegimenError> {
        static EMBEDDED: OnceLock<Result<Arc<RegimenCatalog>, String>> = OnceLock::new();
        EMBEDDED
            .get_or_init(|| {
                RegimenCatalog::load(&EmbeddedRegimens)
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            })
            .clone()
            .map_err(RegimenError::Embedded)
    }

    pub fn from_document(document: RegimenDocument) -> Result<Self, RegimenError> {
        let mut by_organism: BTreeMap<String, Vec<Regimen>> = BTreeMap::new();
        let mut ids = HashSet::new();

        for record in document.regimens {
            if !ids.insert(record.id.clone()) {
                return Err(RegimenError::DuplicateRegimen { id: record.id });
            }
            let regimen = build_regimen(record)?;
            by_organism
                .entry(regimen.organism.clone())
                .or_default()
                .push(regimen);
        }

        Ok(Self {
            version: document.version,
            published: document.published,
            by_organism,
        })
    }

    /// Regimens for an organism key, in knowledge-base order.
    pub fn regimens(&self, key: &str) -> &[Regimen] {
        self.by_organism
            .get(&normalize_key(key, '_'))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Organism entry first, then the category entry.
    pub fn candidates(&self, classification: &Classification) -> Option<Candidates<'_>> {
        [classification.organism_key(), classification.category.key()]
            .into_iter()
            .find_map(|key| {
                self.by_organism
                    .get_key_value(key)
                    .map(|(matched_key, regimens)| Candidates {
                        matched_key: matched_key.as_str(),
                        regimens: regimens.as_slice(),
                    })
            })
    }

    pub fn organisms(&self) -> impl Iterator<Item = &str> {
        self.by_organism.keys().map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&Regimen> {
        self.by_organism.values().flatten().find(|r| r.id == id)
    }
}

fn build_regimen(record: RegimenRecord) -> Result<Regimen, RegimenError> {
    let organism = normalize_key(&record.organism, '_');
    if organism.is_empty() {
        return Err(RegimenError::MissingOrganism { id: record.id });
    }
    if record.options.is_empty() {
        return Err(RegimenError::EmptyRegimen { id: record.id });
    }

    let mut seen = BTreeSet::new();
    let mut options = Vec::with_capacity(record.options.len());
    for (idx, option) in record.options.iter().enumerate() {
        let built = build_option(&record.id, idx, option)?;
        if !seen.insert(built.antibiotic) {
            return Err(RegimenError::DuplicateOption {
                regimen: record.id.clone(),
                antibiotic: built.antibiotic.to_string(),
            });
        }
        options.push(built);
    }

    let scope = resolve_scope(record.scope.as_ref(), &record.condition);
    Ok(Regimen {
        id: record.id,
        organism,
        name: record.name,
        condition: record.condition,
        population: record.population,
        infection_source: record.infection_source,
        primary: record.primary,
        scope,
        options,
    })
}

fn build_option(
    regimen: &str,
    idx: usize,
    record: &DrugOptionRecord,
) -> Result<DrugOption, RegimenError> {
    let antibiotic =
        Antibiotic::resolve(&record.antibiotic).ok_or_else(|| RegimenError::UnknownAntibiotic {
            regimen: regimen.to_string(),
            name: record.antibiotic.clone(),
        })?;
    // Unlabelled options: the first is the preferred one.
    let preference = match record.preference.as_deref().map(|p| normalize_key(p, '_')) {
        Some(p) if p == "primary" || p == "preferred" => Preference::Primary,
        Some(_) => Preference::Alternative,
        None if idx == 0 => Preference::Primary,
        None => Preference::Alternative,
    };
    Ok(DrugOption {
        antibiotic,
        dose: record.dose.clone(),
        route: record.route.clone(),
        frequency: record.frequency.clone(),
        preference,
        notes: record.notes.clone(),
    })
}
