//! Pivoted result documents and response metadata.
//!
//! Pivot header keys are a pure function of their coordinate list and are
//! part of the external contract: clients may dedupe on them, so their
//! format is stable across builds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cache::CacheStats;
use crate::planner::PlanDecision;

use super::types::{AggregationKind, Scalar};

/// Key and label of the synthetic header used when an axis has no
/// coordinates.
pub const ALL_KEY: &str = "__all__";
pub const ALL_LABEL: &str = "All";

/// One resolved (dimension, level, value) coordinate of a pivot header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub dimension: String,
    pub level: String,
    pub value: Scalar,
}

/// A row or column header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotHeader {
    pub key: String,
    pub label: String,
    pub coordinates: Vec<Coordinate>,
}

impl PivotHeader {
    /// Build a header from coordinates. Empty coordinates collapse to the
    /// synthetic `__all__`/"All" header; otherwise the key is
    /// `dim.level:value` segments joined by `|`.
    pub fn from_coordinates(coordinates: Vec<Coordinate>) -> Self {
        if coordinates.is_empty() {
            return Self {
                key: ALL_KEY.to_string(),
                label: ALL_LABEL.to_string(),
                coordinates,
            };
        }

        let key = coordinates
            .iter()
            .map(|c| format!("{}.{}:{}", c.dimension, c.level, c.value.key_string()))
            .collect::<Vec<_>>()
            .join("|");
        let label = coordinates
            .iter()
            .map(|c| c.value.key_string())
            .collect::<Vec<_>>()
            .join(" / ");

        Self {
            key,
            label,
            coordinates,
        }
    }
}

/// Dense matrix for one measure; `values[r][c]` is defined for every
/// row/column header pair, with 0 in unpopulated cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureSeries {
    pub name: String,
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotData {
    pub rows: Vec<PivotHeader>,
    pub columns: Vec<PivotHeader>,
    pub measures: Vec<MeasureSeries>,
}

/// One flattened cell: `"dim.level"` coordinate fields plus measure values.
pub type FlatRow = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryData {
    pub pivot: PivotData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat: Option<Vec<FlatRow>>,
}

/// Measure descriptor surfaced under `metadata.availableMeasures`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub aggregation: AggregationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// One step of a drill path, paired with the level it pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub dimension: String,
    pub level: String,
    pub value: Scalar,
}

/// Cache residency of this response. `ttlRemainingMs` is null only when the
/// entry is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub hit: bool,
    pub key: String,
    pub ttl_remaining_ms: Option<u64>,
    pub stats: CacheStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub cube: String,
    pub measures: Vec<String>,
    pub available_measures: Vec<MeasureInfo>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub cache: CacheStatus,
    pub planner: PlanDecision,
    pub suggestions: Vec<String>,
}

/// The two-part response document: pivoted data plus planner, cache, and
/// visualization metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub data: QueryData,
    pub metadata: ResponseMetadata,
}
