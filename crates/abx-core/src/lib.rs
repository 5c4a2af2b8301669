//! abx-core
//!
//! Shared vocabulary of the antimicrobial decision engine: antibiotics and
//! their classes, organism categories, interpretive calls, case context and
//! the derived assessment types. Pure data, no I/O.

pub mod error;
pub mod models;

/// Fold an identifier into its lookup form: lowercase, with runs of
/// separators (space, `_`, `-`, `/`, `.`, `+`) collapsed into `sep`.
pub fn normalize_key(raw: &str, sep: char) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending = false;
    for c in raw.trim().chars() {
        if matches!(c, ' ' | '_' | '-' | '/' | '.' | '+' | ',' | '\t') {
            pending = !out.is_empty();
            continue;
        }
        if pending {
            out.push(sep);
            pending = false;
        }
        out.extend(c.to_lowercase());
    }
    out
}
