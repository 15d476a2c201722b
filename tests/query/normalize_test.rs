use std::sync::Arc;

use cuboid::model::cube::CubeDefinition;
use cuboid::model::query::QueryPayload;
use cuboid::query::{self, NormalizedQuery};
use cuboid::registry::{CubeInstance, CubeRegistry};
use cuboid::EngineError;
use serde_json::json;

fn sales_cube() -> Arc<CubeInstance> {
    let def: CubeDefinition = serde_json::from_value(json!({
        "name": "sales",
        "dimensions": [
            {"name": "time", "hierarchy": ["year", "quarter", "month"]},
            {"name": "geography", "hierarchy": ["region", "country", "state"]},
            {"name": "product", "hierarchy": ["category", "item"]}
        ],
        "measures": [
            {"name": "revenue", "valueField": "revenue", "aggregation": "sum"},
            {"name": "units", "valueField": "units", "aggregation": "sum"}
        ],
        "facts": []
    }))
    .unwrap();

    let registry = CubeRegistry::new();
    registry.register(def).unwrap()
}

fn normalize(payload: serde_json::Value) -> Result<NormalizedQuery, EngineError> {
    let payload: QueryPayload = serde_json::from_value(payload).unwrap();
    query::normalize(&payload, &sales_cube())
}

#[test]
fn test_missing_level_defaults_to_finest() {
    let normalized = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "rows": [{"dimension": "geography"}]
    }))
    .unwrap();

    assert_eq!(normalized.rows[0].level, "state");
}

#[test]
fn test_no_axes_synthesizes_default_row_axis() {
    let normalized = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"]
    }))
    .unwrap();

    // First dimension at its coarsest level.
    assert_eq!(normalized.rows.len(), 1);
    assert_eq!(normalized.rows[0].dimension, "time");
    assert_eq!(normalized.rows[0].level, "year");
    assert!(normalized.columns.is_empty());
}

#[test]
fn test_pivot_block_wins_over_top_level_axes() {
    let normalized = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "rows": [{"dimension": "time", "level": "year"}],
        "pivot": {"rows": [{"dimension": "product", "level": "category"}]}
    }))
    .unwrap();

    assert_eq!(normalized.rows.len(), 1);
    assert_eq!(normalized.rows[0].dimension, "product");
}

#[test]
fn test_structured_payload_wins_over_shorthand() {
    let normalized = normalize(json!({
        "cube": "sales",
        "measures": ["units"],
        "rows": [{"dimension": "geography", "level": "region"}],
        "mdx": "MEASURES revenue; ROWS time.year"
    }))
    .unwrap();

    assert_eq!(normalized.measures, vec!["units"]);
    assert_eq!(normalized.rows[0].dimension, "geography");
}

#[test]
fn test_shorthand_fills_fields_the_payload_omits() {
    let normalized = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "mdx": "ROWS time.quarter; SLICE geography.region = 'Europe'"
    }))
    .unwrap();

    assert_eq!(normalized.rows[0].level, "quarter");
    assert_eq!(normalized.filters.len(), 1);
    assert_eq!(normalized.filters[0].dimension, "geography");
}

#[test]
fn test_filters_preserve_slice_dice_filter_order() {
    let normalized = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "slices": [{"dimension": "geography", "level": "region", "operator": "eq", "value": "Europe"}],
        "dices": [{"dimension": "time", "level": "quarter", "operator": "in", "value": ["Q1", "Q2"]}],
        "filters": [{"dimension": "time", "level": "year", "operator": "gte", "value": 2023}]
    }))
    .unwrap();

    let dims: Vec<&str> = normalized.filters.iter().map(|f| f.dimension.as_str()).collect();
    assert_eq!(dims, vec!["geography", "time", "time"]);
}

#[test]
fn test_filter_level_defaults_to_finest() {
    let normalized = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "filters": [{"dimension": "product", "operator": "eq", "value": "Laptop"}]
    }))
    .unwrap();

    assert_eq!(normalized.filters[0].level, "item");
}

#[test]
fn test_rollup_rewrites_finer_axes_only() {
    let normalized = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "rows": [
            {"dimension": "time", "level": "year"},
            {"dimension": "time", "level": "month"}
        ],
        "rollup": {"dimension": "time", "level": "quarter"}
    }))
    .unwrap();

    // year is coarser than the rollup level and stays; month coarsens.
    assert_eq!(normalized.rows[0].level, "year");
    assert_eq!(normalized.rows[1].level, "quarter");
}

#[test]
fn test_drill_rewrites_its_dimension_to_the_target_level() {
    let normalized = normalize(json!({
        "cube": "sales",
        "measures": ["units"],
        "rows": [{"dimension": "time", "level": "year"}],
        "drill": {"dimension": "time", "fromLevel": "year", "toLevel": "month", "path": [2023]}
    }))
    .unwrap();

    assert_eq!(normalized.rows[0].level, "month");
    assert_eq!(normalized.drill.unwrap().path.len(), 1);
}

#[test]
fn test_include_flattened_defaults_to_true() {
    let normalized = normalize(json!({"cube": "sales", "measures": ["revenue"]})).unwrap();
    assert!(normalized.include_flattened);

    let off = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "includeFlattened": false
    }))
    .unwrap();
    assert!(!off.include_flattened);
}

#[test]
fn test_empty_measures_are_rejected() {
    let err = normalize(json!({"cube": "sales"})).unwrap_err();
    assert!(matches!(err, EngineError::EmptyMeasures));
    assert_eq!(err.status_class(), 400);
}

#[test]
fn test_unknown_measure_is_rejected() {
    let err = normalize(json!({"cube": "sales", "measures": ["profit"]})).unwrap_err();
    assert!(matches!(err, EngineError::UnknownMeasure { .. }));
}

#[test]
fn test_unknown_dimension_and_level_are_rejected() {
    let err = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "rows": [{"dimension": "channel"}]
    }))
    .unwrap_err();
    assert!(matches!(err, EngineError::UnknownDimension { .. }));

    let err = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "rows": [{"dimension": "time", "level": "week"}]
    }))
    .unwrap_err();
    assert!(matches!(err, EngineError::UnknownLevel { .. }));
}

#[test]
fn test_malformed_drill_is_rejected() {
    let err = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "drill": {"dimension": "time", "fromLevel": "year", "toLevel": "week"}
    }))
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDrill { .. }));

    // Path longer than the drilled range.
    let err = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "drill": {
            "dimension": "time",
            "fromLevel": "year",
            "toLevel": "quarter",
            "path": [2023, "Q1", "extra"]
        }
    }))
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDrill { .. }));
}

#[test]
fn test_malformed_rollup_is_rejected() {
    let err = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "rollup": {"dimension": "time", "level": "week"}
    }))
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRollup { .. }));
}

#[test]
fn test_filter_value_shapes_are_validated() {
    // in with a scalar
    let err = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "filters": [{"dimension": "time", "operator": "in", "value": "Q1"}]
    }))
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidFilter { .. }));

    // between with three values
    let err = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "filters": [{"dimension": "time", "operator": "between", "value": [1, 2, 3]}]
    }))
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidFilter { .. }));

    // gt with a string
    let err = normalize(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "filters": [{"dimension": "time", "operator": "gt", "value": "high"}]
    }))
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidFilter { .. }));
}
