//! Conversion of raw boundary and distribution data into grade mappings
//!
//! Raw data arrives either already structured or as text in the literal
//! grammar of [`crate::literal`]. Both normalize to the same ordered maps,
//! keyed by grade label in lexicographic order.

use crate::literal::{parse_literal, write_quoted, Literal};
use grade_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Grade label to closed scaled-mark interval `(lower, upper)`
pub type Boundaries = BTreeMap<String, (i64, i64)>;

/// Grade label to share of candidates
pub type Distribution = BTreeMap<String, f64>;

/// Raw record data: a structured mapping or its textual serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawData<T> {
    /// Already-structured mapping, passed through
    Structured(T),
    /// Text in the restricted literal grammar
    Text(String),
}

impl From<Boundaries> for RawData<Boundaries> {
    fn from(value: Boundaries) -> Self {
        Self::Structured(value)
    }
}

impl From<Distribution> for RawData<Distribution> {
    fn from(value: Distribution) -> Self {
        Self::Structured(value)
    }
}

impl<T> From<String> for RawData<T> {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T> From<&str> for RawData<T> {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Normalize grade boundary data
///
/// Text must be a mapping from quoted grade labels to 2-tuples of integers.
///
/// # Examples
///
/// ```rust
/// use grade_subject::normalize::normalize_bounds;
///
/// let bounds = normalize_bounds("{'1': (0, 14), '2': (15, 26)}").unwrap();
/// assert_eq!(bounds["2"], (15, 26));
/// ```
pub fn normalize_bounds(input: impl Into<RawData<Boundaries>>) -> Result<Boundaries> {
    match input.into() {
        RawData::Structured(bounds) => Ok(bounds),
        RawData::Text(text) => {
            let entries = parse_mapping(&text)?;
            entries
                .into_iter()
                .map(|(label, value)| {
                    let interval = match &value {
                        Literal::Tuple(items) => match items.as_slice() {
                            [Literal::Int(lower), Literal::Int(upper)] => Some((*lower, *upper)),
                            _ => None,
                        },
                        _ => None,
                    };
                    interval.map(|interval| (label, interval)).ok_or_else(|| {
                        Error::format(
                            value.to_string(),
                            "expected a boundary tuple of two integers",
                        )
                    })
                })
                .collect()
        }
    }
}

/// Normalize grade distribution data
///
/// Text must be a mapping from quoted grade labels to numbers; every value
/// is coerced to `f64`.
///
/// # Examples
///
/// ```rust
/// use grade_subject::normalize::normalize_distribution;
///
/// let dist = normalize_distribution("{'6': 0.308, '7': 1}").unwrap();
/// assert_eq!(dist["7"], 1.0);
/// ```
pub fn normalize_distribution(input: impl Into<RawData<Distribution>>) -> Result<Distribution> {
    match input.into() {
        RawData::Structured(distribution) => Ok(distribution),
        RawData::Text(text) => {
            let entries = parse_mapping(&text)?;
            entries
                .into_iter()
                .map(|(label, value)| {
                    value
                        .as_f64()
                        .map(|weight| (label, weight))
                        .ok_or_else(|| Error::format(value.to_string(), "expected a number"))
                })
                .collect()
        }
    }
}

/// Parse text that must be a mapping keyed by strings
fn parse_mapping(text: &str) -> Result<Vec<(String, Literal)>> {
    match parse_literal(text)? {
        Literal::Map(entries) => entries
            .into_iter()
            .map(|(key, value)| match key {
                Literal::Str(label) => Ok((label, value)),
                other => Err(Error::format(
                    other.to_string(),
                    format!("grade labels must be strings, not {}", other.kind()),
                )),
            })
            .collect(),
        other => Err(Error::format(
            other.to_string(),
            format!("expected a mapping, found {}", other.kind()),
        )),
    }
}

/// Render boundaries in the literal grammar
///
/// ```rust
/// use grade_subject::normalize::{bounds_to_literal, normalize_bounds, Boundaries};
///
/// let bounds = Boundaries::from([("1".to_string(), (0, 14)), ("2".to_string(), (15, 26))]);
/// let text = bounds_to_literal(&bounds);
/// assert_eq!(text, "{'1': (0, 14), '2': (15, 26)}");
/// assert_eq!(normalize_bounds(text).unwrap(), bounds);
/// ```
pub fn bounds_to_literal(bounds: &Boundaries) -> String {
    render_mapping(bounds, |out, (lower, upper)| write!(out, "({lower}, {upper})"))
}

/// Render a distribution in the literal grammar
pub fn distribution_to_literal(distribution: &Distribution) -> String {
    render_mapping(distribution, |out, weight| write!(out, "{weight:?}"))
}

fn render_mapping<V>(
    map: &BTreeMap<String, V>,
    mut write_value: impl FnMut(&mut String, &V) -> std::fmt::Result,
) -> String {
    let mut out = String::from("{");
    for (i, (label, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // Writing into a String cannot fail
        let _ = write_quoted(&mut out, label);
        out.push_str(": ");
        let _ = write_value(&mut out, value);
    }
    out.push('}');
    out
}
