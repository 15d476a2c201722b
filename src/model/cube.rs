// src/model/cube.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{AggregationKind, Scalar};

/// A cube definition as submitted at registration: dimensions, measures,
/// and the fact rows to aggregate. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub facts: Vec<FactRow>,
}

/// A categorical attribute with an ordered coarse-to-fine hierarchy of
/// levels, e.g. time: year → quarter → month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub hierarchy: Vec<String>,
}

impl Dimension {
    /// Position of a level in the hierarchy; 0 is the coarsest.
    pub fn level_index(&self, level: &str) -> Option<usize> {
        self.hierarchy.iter().position(|l| l == level)
    }

    pub fn coarsest_level(&self) -> Option<&str> {
        self.hierarchy.first().map(String::as_str)
    }

    pub fn finest_level(&self) -> Option<&str> {
        self.hierarchy.last().map(String::as_str)
    }
}

/// A numerically aggregatable quantity read from a fact metric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub name: String,
    pub value_field: String,
    pub aggregation: AggregationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// One observation: per-dimension level coordinates plus metric values.
/// Any subset of levels may be populated; a missing level renders under
/// the "All" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
    #[serde(default)]
    pub dimensions: HashMap<String, HashMap<String, Scalar>>,
    #[serde(default)]
    pub metrics: HashMap<String, Option<Scalar>>,
}

impl FactRow {
    /// Value this fact carries at (dimension, level), if any.
    pub fn coordinate(&self, dimension: &str, level: &str) -> Option<&Scalar> {
        self.dimensions
            .get(dimension)
            .and_then(|levels| levels.get(level))
    }

    /// Metric value for a measure's value field; absent and null unify.
    pub fn metric(&self, field: &str) -> Option<&Scalar> {
        self.metrics.get(field).and_then(|v| v.as_ref())
    }
}
