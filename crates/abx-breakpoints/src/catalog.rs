//! Typed, validated breakpoint tables.
//!
//! A [`BreakpointCatalog`] is built once from a [`CatalogDocument`] and is
//! read-only afterwards. Validation happens here, at load time, so the
//! comparator can treat every boundary as well-formed.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use abx_core::models::antibiotic::Antibiotic;
use abx_core::models::case::InfectionSite;
use abx_core::models::organism::OrganismCategory;
use abx_core::normalize_key;

use crate::error::KnowledgeBaseError;
use crate::measurement::{ComparisonOp, EPSILON, Measurement, parse_measurement};
use crate::schema::{BreakpointRecord, CatalogDocument, DiskRecord, VersionProbe};
use crate::source::{EmbeddedSource, KnowledgeSource};

/// A single threshold such as `≤2` or `≥32`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Boundary {
    pub raw: String,
    pub operator: Option<ComparisonOp>,
    pub value: f64,
}

/// A declared range such as `16` or `4-8`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BoundaryRange {
    pub raw: String,
    pub low: f64,
    pub high: f64,
}

impl BoundaryRange {
    /// Whether the measurement's comparand falls inside the range.
    pub fn contains(&self, measurement: &Measurement) -> bool {
        let value = measurement.magnitude;
        value >= self.low - EPSILON && value <= self.high + EPSILON
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiskBreakpoints {
    pub susceptible: Option<Boundary>,
    pub intermediate: Option<BoundaryRange>,
    pub resistant: Option<Boundary>,
}

/// Breakpoints for one organism category and antibiotic, optionally scoped
/// to an infection site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BreakpointSet {
    pub antibiotic: Antibiotic,
    pub site: Option<InfectionSite>,
    pub susceptible: Option<Boundary>,
    pub sdd: Option<BoundaryRange>,
    pub intermediate: Option<BoundaryRange>,
    pub resistant: Option<Boundary>,
    pub disk: Option<DiskBreakpoints>,
    pub condition: Option<String>,
    pub tier: u8,
}

impl BreakpointSet {
    /// Compact rendering such as `S ≤1 / I 2 / R ≥4`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(s) = &self.susceptible {
            parts.push(format!("S {}", s.raw));
        }
        if let Some(sdd) = &self.sdd {
            parts.push(format!("SDD {}", sdd.raw));
        }
        if let Some(i) = &self.intermediate {
            parts.push(format!("I {}", i.raw));
        }
        if let Some(r) = &self.resistant {
            parts.push(format!("R {}", r.raw));
        }
        parts.join(" / ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismEntry {
    pub id: String,
    pub category: OrganismCategory,
    pub aliases: Vec<String>,
    pub intrinsic_resistance: BTreeSet<Antibiotic>,
}

impl OrganismEntry {
    /// First segment of the identifier (`escherichia` for
    /// `escherichia_coli`).
    pub fn genus(&self) -> &str {
        self.id.split('_').next().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    pub intrinsic_resistance: BTreeSet<Antibiotic>,
    pub organisms: Vec<OrganismEntry>,
    routine: BTreeMap<Antibiotic, BreakpointSet>,
    site_specific: BTreeMap<(Antibiotic, InfectionSite), BreakpointSet>,
}

impl CategoryTable {
    pub fn routine(&self) -> impl Iterator<Item = &BreakpointSet> {
        self.routine.values()
    }

    pub fn site_specific(&self) -> impl Iterator<Item = &BreakpointSet> {
        self.site_specific.values()
    }
}

/// Result of a breakpoint lookup.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedBreakpoints<'a> {
    pub set: &'a BreakpointSet,
    /// Set when a site-specific set replaced the routine one.
    pub site_override: Option<InfectionSite>,
}

#[derive(Debug, Clone)]
pub struct BreakpointCatalog {
    pub version: String,
    pub standard: String,
    pub published: jiff::civil::Date,
    categories: BTreeMap<OrganismCategory, CategoryTable>,
    /// Normalized identifier or alias → (category, index into its organisms).
    organism_index: HashMap<String, (OrganismCategory, usize)>,
}

impl BreakpointCatalog {
    pub fn from_json(text: &str) -> Result<Self, KnowledgeBaseError> {
        let document: CatalogDocument = serde_json::from_str(text)?;
        Self::from_document(document)
    }

    pub fn load(source: &dyn KnowledgeSource) -> Result<Self, KnowledgeBaseError> {
        let text = source.read()?;
        let catalog = Self::from_json(&text)?;
        info!(
            location = %source.location(),
            version = %catalog.version,
            categories = catalog.categories.len(),
            "loaded breakpoint catalog"
        );
        Ok(catalog)
    }

    /// The catalog compiled into the crate, parsed once per process.
    pub fn embedded() -> Result<Arc<Self>, KnowledgeBaseError> {
        static EMBEDDED: OnceLock<Result<Arc<BreakpointCatalog>, String>> = OnceLock::new();
        EMBEDDED
            .get_or_init(|| {
                BreakpointCatalog::load(&EmbeddedSource)
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            })
            .clone()
            .map_err(KnowledgeBaseError::Embedded)
    }

    pub fn from_document(document: CatalogDocument) -> Result<Self, KnowledgeBaseError> {
        let mut categories = BTreeMap::new();
        let mut organism_index = HashMap::new();

        for record in document.categories {
            let category = record.category;
            if categories.contains_key(&category) {
                return Err(KnowledgeBaseError::DuplicateCategory(category));
            }

            let mut table = CategoryTable {
                intrinsic_resistance: resolve_all(category, &record.intrinsic_resistance)?,
                ..Default::default()
            };

            for (idx, organism) in record.organisms.iter().enumerate() {
                let id = normalize_key(&organism.id, '_');
                let aliases: Vec<String> =
                    organism.aliases.iter().map(|a| normalize_key(a, '_')).collect();
                for key in std::iter::once(&id).chain(aliases.iter()) {
                    if organism_index.insert(key.clone(), (category, idx)).is_some() {
                        return Err(KnowledgeBaseError::DuplicateOrganism {
                            identifier: key.clone(),
                        });
                    }
                }
                table.organisms.push(OrganismEntry {
                    id,
                    category,
                    aliases,
                    intrinsic_resistance: resolve_all(category, &organism.intrinsic_resistance)?,
                });
            }

            for bp in &record.breakpoints {
                let set = build_set(category, bp)?;
                let duplicate = match set.site {
                    None => table.routine.insert(set.antibiotic, set.clone()).is_some(),
                    Some(site) => table
                        .site_specific
                        .insert((set.antibiotic, site), set.clone())
                        .is_some(),
                };
                if duplicate {
                    return Err(KnowledgeBaseError::DuplicateBreakpoint {
                        category,
                        antibiotic: set.antibiotic.to_string(),
                        site: set.site.map(|s| s.to_string()).unwrap_or_else(|| "routine".into()),
                    });
                }
            }

            debug!(
                category = category.key(),
                routine = table.routine.len(),
                site_specific = table.site_specific.len(),
                "validated category"
            );
            categories.insert(category, table);
        }

        Ok(Self {
            version: document.version,
            standard: document.standard,
            published: document.published,
            categories,
            organism_index,
        })
    }

    pub fn table(&self, category: OrganismCategory) -> Option<&CategoryTable> {
        self.categories.get(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = OrganismCategory> + '_ {
        self.categories.keys().copied()
    }

    /// Look up an organism by normalized identifier or alias.
    pub fn organism(&self, normalized: &str) -> Option<&OrganismEntry> {
        let (category, idx) = self.organism_index.get(normalized)?;
        self.categories.get(category)?.organisms.get(*idx)
    }

    /// The breakpoint set for `antibiotic`, preferring a site-specific set
    /// when `site` has one.
    pub fn breakpoints(
        &self,
        category: OrganismCategory,
        antibiotic: Antibiotic,
        site: Option<InfectionSite>,
    ) -> Option<ResolvedBreakpoints<'_>> {
        let table = self.categories.get(&category)?;
        if let Some(site) = site
            && let Some(set) = table.site_specific.get(&(antibiotic, site))
        {
            return Some(ResolvedBreakpoints {
                set,
                site_override: Some(site),
            });
        }
        table.routine.get(&antibiotic).map(|set| ResolvedBreakpoints {
            set,
            site_override: None,
        })
    }

    /// Union of the category list and, when known, the organism's own list.
    pub fn intrinsic_resistance(
        &self,
        category: OrganismCategory,
        organism_id: Option<&str>,
    ) -> BTreeSet<Antibiotic> {
        let mut out = self
            .categories
            .get(&category)
            .map(|t| t.intrinsic_resistance.clone())
            .unwrap_or_default();
        if let Some(entry) = organism_id.and_then(|id| self.organism(id))
            && entry.category == category
        {
            out.extend(entry.intrinsic_resistance.iter().copied());
        }
        out
    }

    pub fn is_intrinsically_resistant(
        &self,
        category: OrganismCategory,
        organism_id: Option<&str>,
        antibiotic: Antibiotic,
    ) -> bool {
        self.intrinsic_resistance(category, organism_id)
            .contains(&antibiotic)
    }
}

fn resolve_all(
    category: OrganismCategory,
    names: &[String],
) -> Result<BTreeSet<Antibiotic>, KnowledgeBaseError> {
    names
        .iter()
        .map(|name| {
            Antibiotic::resolve(name).ok_or_else(|| KnowledgeBaseError::UnknownAntibiotic {
                category,
                name: name.clone(),
            })
        })
        .collect()
}

fn build_set(
    category: OrganismCategory,
    record: &BreakpointRecord,
) -> Result<BreakpointSet, KnowledgeBaseError> {
    let antibiotic =
        Antibiotic::resolve(&record.antibiotic).ok_or_else(|| KnowledgeBaseError::UnknownAntibiotic {
            category,
            name: record.antibiotic.clone(),
        })?;
    let name = antibiotic.name();

    if !(1..=4).contains(&record.tier) {
        return Err(KnowledgeBaseError::InvalidTier {
            category,
            antibiotic: name.to_string(),
            tier: record.tier,
        });
    }

    let boundary = |field, raw: &Option<String>| parse_boundary(category, name, field, raw);
    let range = |field, raw: &Option<String>| parse_range(category, name, field, raw);

    let susceptible = boundary("susceptible", &record.susceptible)?;
    let resistant = boundary("resistant", &record.resistant)?;
    let sdd = range("sdd", &record.sdd)?;
    let intermediate = range("intermediate", &record.intermediate)?;

    if susceptible.is_none() && resistant.is_none() {
        return Err(KnowledgeBaseError::MissingBoundaries {
            category,
            antibiotic: name.to_string(),
        });
    }

    let out_of_order = |detail: String| KnowledgeBaseError::OutOfOrder {
        category,
        antibiotic: name.to_string(),
        detail,
    };
    if let (Some(s), Some(r)) = (&susceptible, &resistant)
        && s.value >= r.value
    {
        return Err(out_of_order(format!("S {} is not below R {}", s.raw, r.raw)));
    }
    for middle in [&sdd, &intermediate].into_iter().flatten() {
        if let Some(s) = &susceptible
            && middle.low < s.value
        {
            return Err(out_of_order(format!("{} starts below S {}", middle.raw, s.raw)));
        }
        if let Some(r) = &resistant
            && middle.high > r.value
        {
            return Err(out_of_order(format!("{} ends above R {}", middle.raw, r.raw)));
        }
    }

    let disk = record
        .disk
        .as_ref()
        .map(|d| build_disk(category, name, d))
        .transpose()?;

    Ok(BreakpointSet {
        antibiotic,
        site: record.site,
        susceptible,
        sdd,
        intermediate,
        resistant,
        disk,
        condition: record.condition.clone(),
        tier: record.tier,
    })
}

fn build_disk(
    category: OrganismCategory,
    name: &str,
    record: &DiskRecord,
) -> Result<DiskBreakpoints, KnowledgeBaseError> {
    let susceptible = parse_boundary(category, name, "disk susceptible", &record.susceptible)?;
    let intermediate = parse_range(category, name, "disk intermediate", &record.intermediate)?;
    let resistant = parse_boundary(category, name, "disk resistant", &record.resistant)?;

    // Zones run the other way: a larger zone means more susceptible.
    if let (Some(s), Some(r)) = (&susceptible, &resistant)
        && s.value <= r.value
    {
        return Err(KnowledgeBaseError::OutOfOrder {
            category,
            antibiotic: name.to_string(),
            detail: format!("disk S {} is not above disk R {}", s.raw, r.raw),
        });
    }
    Ok(DiskBreakpoints {
        susceptible,
        intermediate,
        resistant,
    })
}

fn parse_boundary(
    category: OrganismCategory,
    antibiotic: &str,
    field: &'static str,
    raw: &Option<String>,
) -> Result<Option<Boundary>, KnowledgeBaseError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let m = parse_measurement(raw);
    if !m.parsed {
        return Err(KnowledgeBaseError::InvalidBoundary {
            category,
            antibiotic: antibiotic.to_string(),
            field,
            value: raw.clone(),
        });
    }
    Ok(Some(Boundary {
        raw: raw.clone(),
        operator: m.operator,
        value: m.magnitude,
    }))
}

fn parse_range(
    category: OrganismCategory,
    antibiotic: &str,
    field: &'static str,
    raw: &Option<String>,
) -> Result<Option<BoundaryRange>, KnowledgeBaseError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let m = parse_measurement(raw);
    if !m.parsed {
        return Err(KnowledgeBaseError::InvalidBoundary {
            category,
            antibiotic: antibiotic.to_string(),
            field,
            value: raw.clone(),
        });
    }
    Ok(Some(BoundaryRange {
        raw: raw.clone(),
        low: m.low,
        high: m.high,
    }))
}

/// Memoizes loaded catalogs by their declared version, so repeated loads of
/// the same data set share one validated instance.
#[derive(Debug, Default)]
pub struct CatalogCache {
    loaded: Mutex<HashMap<String, Arc<BreakpointCatalog>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        &self,
        source: &dyn KnowledgeSource,
    ) -> Result<Arc<BreakpointCatalog>, KnowledgeBaseError> {
        let text = source.read()?;
        let probe: VersionProbe = serde_json::from_str(&text)?;

        if let Some(hit) = self.lock().get(&probe.version) {
            debug!(version = %probe.version, "breakpoint catalog cache hit");
            return Ok(Arc::clone(hit));
        }

        let catalog = Arc::new(BreakpointCatalog::from_json(&text)?);
        info!(
            location = %source.location(),
            version = %catalog.version,
            "loaded breakpoint catalog"
        );
        self.lock()
            .entry(catalog.version.clone())
            .or_insert_with(|| Arc::clone(&catalog));
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<BreakpointCatalog>>> {
        self.loaded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
