//! Formatting attributes attached to `insert` and `retain` ops.
//!
//! A `null` attribute value is an erasure: over a `retain` it removes the
//! format, inside a document it carries no meaning and is stripped.

use serde_json::{Map, Value};

pub type Attributes = Map<String, Value>;

/// Drop erasures (`null` values). Returns `None` when nothing is left.
pub fn strip_erasures(attr: Option<&Attributes>) -> Option<Attributes> {
    let attr = attr?;
    let cleaned: Attributes = attr
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Apply `b` on top of `a`.
///
/// Keys in `b` win. With `keep_null` erasures from `b` survive (the result is
/// still a change); without it they are removed (the result is content).
pub fn compose(
    a: Option<&Attributes>,
    b: Option<&Attributes>,
    keep_null: bool,
) -> Option<Attributes> {
    let mut out = b.cloned().unwrap_or_default();
    if !keep_null {
        out.retain(|_, value| !value.is_null());
    }
    if let Some(a) = a {
        for (key, value) in a {
            if !b.is_some_and(|b| b.contains_key(key)) {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
