//! Parsing of MIC values, zone diameters and breakpoint boundaries.
//!
//! Accepted forms, after an optional leading operator (`≤ ≥ < > <= >= =`):
//!
//! - plain decimal: `0.5`, `16`
//! - combination ratio: `4/76` (the numerator is the comparand)
//! - range: `2-4` (the comparand is the mean of the bounds; bounds may be
//!   ratios, as in `1/19-2/38`)
//!
//! A trailing unit (`mg/L`, `µg/mL`, `mm`) is ignored. Parsing never fails:
//! an unreadable value yields magnitude 0 with `parsed == false`.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

const UNIT_SUFFIXES: &[&str] = &["µg/ml", "μg/ml", "ug/ml", "mcg/ml", "mg/l", "mm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ComparisonOp {
    Le,
    Lt,
    Ge,
    Gt,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Le => "≤",
            Self::Lt => "<",
            Self::Ge => "≥",
            Self::Gt => ">",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MeasurementForm {
    Plain,
    Ratio,
    Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Measurement {
    pub raw: String,
    pub operator: Option<ComparisonOp>,
    /// The comparable value.
    pub magnitude: f64,
    /// Lower and upper bound; equal to `magnitude` unless `form` is a range.
    pub low: f64,
    pub high: f64,
    pub form: MeasurementForm,
    /// False when the input could not be read and `magnitude` is a
    /// placeholder 0.
    pub parsed: bool,
}

impl Measurement {
    fn unreadable(raw: &str, operator: Option<ComparisonOp>) -> Self {
        Self {
            raw: raw.to_string(),
            operator,
            magnitude: 0.0,
            low: 0.0,
            high: 0.0,
            form: MeasurementForm::Plain,
            parsed: false,
        }
    }
}

/// Tolerance for comparing doubling-dilution values that went through
/// decimal text.
pub const EPSILON: f64 = 1e-9;

/// Parse a raw measurement or boundary string.
pub fn parse_measurement(raw: &str) -> Measurement {
    let (operator, body) = split_operator(raw.trim());
    let body = strip_unit(body);
    if body.is_empty() {
        return Measurement::unreadable(raw, operator);
    }

    if let Some((left, right)) = split_range(&body) {
        return match (parse_scalar(left), parse_scalar(right)) {
            (Some(a), Some(b)) => {
                let (low, high) = if a <= b { (a, b) } else { (b, a) };
                Measurement {
                    raw: raw.to_string(),
                    operator,
                    magnitude: (low + high) / 2.0,
                    low,
                    high,
                    form: MeasurementForm::Range,
                    parsed: true,
                }
            }
            _ => Measurement::unreadable(raw, operator),
        };
    }

    let form = if body.contains('/') {
        MeasurementForm::Ratio
    } else {
        MeasurementForm::Plain
    };
    match parse_scalar(&body) {
        Some(value) => Measurement {
            raw: raw.to_string(),
            operator,
            magnitude: value,
            low: value,
            high: value,
            form,
            parsed: true,
        },
        None => Measurement::unreadable(raw, operator),
    }
}

fn split_operator(s: &str) -> (Option<ComparisonOp>, &str) {
    const PREFIXES: &[(&str, Option<ComparisonOp>)] = &[
        ("<=", Some(ComparisonOp::Le)),
        ("=<", Some(ComparisonOp::Le)),
        (">=", Some(ComparisonOp::Ge)),
        ("=>", Some(ComparisonOp::Ge)),
        ("≤", Some(ComparisonOp::Le)),
        ("≥", Some(ComparisonOp::Ge)),
        ("<", Some(ComparisonOp::Lt)),
        (">", Some(ComparisonOp::Gt)),
        ("=", None),
    ];
    for (prefix, op) in PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            return (*op, rest.trim_start());
        }
    }
    (None, s)
}

fn strip_unit(s: &str) -> String {
    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .replace(',', ".")
        .replace('–', "-");
    for unit in UNIT_SUFFIXES {
        if let Some(rest) = compact.strip_suffix(unit) {
            return rest.to_string();
        }
    }
    compact
}

/// Split `a-b` at the first hyphen that is not a leading sign.
fn split_range(s: &str) -> Option<(&str, &str)> {
    let idx = s.char_indices().skip(1).find(|(_, c)| *c == '-')?.0;
    Some((&s[..idx], &s[idx + 1..]))
}

/// A plain decimal or the numerator of a ratio.
fn parse_scalar(s: &str) -> Option<f64> {
    let numerator = s.split('/').next()?;
    let value: f64 = numerator.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}
