//! Scalar values and aggregation kinds.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Coordinate value used when a fact row carries nothing at a level.
pub const ALL_SENTINEL: &str = "All";

/// A fact coordinate, metric, or filter value.
///
/// Fact rows mix numbers and strings freely; numeric operators apply only to
/// the `Number` variant and fail predicates on anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Str(String),
}

impl Scalar {
    /// The sentinel coordinate for a missing level value.
    pub fn all() -> Self {
        Scalar::Str(ALL_SENTINEL.to_string())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Str(_) => None,
        }
    }

    /// Canonical string form, used for grouping keys, DISTINCT sets, pivot
    /// keys, and labels. Integral floats render without a fractional suffix
    /// so the year `2023.0` keys as `"2023"`.
    pub fn key_string(&self) -> String {
        match self {
            Scalar::Number(n) => format_number(*n),
            Scalar::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => f.write_str(&format_number(*n)),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<&Scalar> for serde_json::Value {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Scalar::Str(s) => serde_json::Value::String(s.clone()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    // Use ryu for fast, accurate float formatting
    let mut buffer = ryu::Buffer::new();
    buffer.format(n).to_string()
}

/// Total order for pivot row ordering: numbers compare numerically, anything
/// else compares on the canonical string form. NaN sorts last.
pub fn canonical_cmp(a: &Scalar, b: &Scalar) -> Ordering {
    match (a, b) {
        (Scalar::Number(x), Scalar::Number(y)) => match x.partial_cmp(y) {
            Some(ord) => ord,
            None => x.is_nan().cmp(&y.is_nan()),
        },
        _ => a.key_string().cmp(&b.key_string()),
    }
}

/// Aggregation kinds for measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    Sum,
    Count,
    Avg,
    Min,
    Max,
    Distinct,
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationKind::Sum => write!(f, "SUM"),
            AggregationKind::Count => write!(f, "COUNT"),
            AggregationKind::Avg => write!(f, "AVG"),
            AggregationKind::Min => write!(f, "MIN"),
            AggregationKind::Max => write!(f, "MAX"),
            AggregationKind::Distinct => write!(f, "DISTINCT"),
        }
    }
}
