//! Wire-level query payload.
//!
//! Everything except `cube` is optional; `measures` must be non-empty after
//! the shorthand merge. Slices, dices, and filters are three surface names
//! for the same predicate shape and are unified during normalization.

use serde::{Deserialize, Serialize};

use super::types::Scalar;

/// A multidimensional query as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    pub cube: String,
    #[serde(default)]
    pub measures: Vec<String>,
    #[serde(default)]
    pub rows: Vec<AxisInput>,
    #[serde(default)]
    pub columns: Vec<AxisInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<PivotInput>,
    #[serde(default)]
    pub slices: Vec<FilterInput>,
    #[serde(default)]
    pub dices: Vec<FilterInput>,
    #[serde(default)]
    pub filters: Vec<FilterInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill: Option<DrillInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollup: Option<RollupInput>,
    /// Terse textual shorthand; parsed first, then overridden field by
    /// field by the structured payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mdx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_flattened: Option<bool>,
}

/// Explicit pivot axes; these win over the top-level `rows`/`columns`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<AxisInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<AxisInput>>,
}

/// One pivoting direction: a dimension, optionally pinned to a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisInput {
    pub dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl AxisInput {
    /// Axis on a dimension at its default (finest) level.
    pub fn new(dimension: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            level: None,
            sort: None,
            alias: None,
        }
    }

    /// Axis pinned to a specific level.
    pub fn at_level(dimension: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            level: Some(level.into()),
            sort: None,
            alias: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A predicate over one (dimension, level) coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterInput {
    pub dimension: String,
    /// Defaults to the dimension's finest level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub operator: FilterOp,
    pub value: FilterValue,
}

/// Predicate operators shared by slices, dices, and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Neq,
    In,
    Nin,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
}

/// A filter's right-hand side: one scalar, or a list for `in`/`nin`/
/// `between`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(Scalar),
    Many(Vec<Scalar>),
}

/// Refine rendering to a finer level, optionally pinned to ancestor values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillInput {
    pub dimension: String,
    pub from_level: String,
    pub to_level: String,
    #[serde(default)]
    pub path: Vec<Scalar>,
}

/// Raise rendering to a coarser level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupInput {
    pub dimension: String,
    pub level: String,
}
