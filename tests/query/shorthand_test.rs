use cuboid::model::query::{AxisInput, FilterOp, FilterValue};
use cuboid::model::types::Scalar;
use cuboid::query::shorthand;
use cuboid::EngineError;

#[test]
fn test_full_statement() {
    let parsed = shorthand::parse(
        "MEASURES revenue, units; \
         ROWS time.year, geography.region; \
         COLUMNS product.category; \
         SLICE geography.region = 'North America'; \
         FILTER time.year >= 2023",
    )
    .unwrap();

    assert_eq!(parsed.measures, vec!["revenue", "units"]);
    assert_eq!(
        parsed.rows,
        vec![
            AxisInput::at_level("time", "year"),
            AxisInput::at_level("geography", "region"),
        ]
    );
    assert_eq!(parsed.columns, vec![AxisInput::at_level("product", "category")]);

    assert_eq!(parsed.slices.len(), 1);
    assert_eq!(parsed.slices[0].operator, FilterOp::Eq);
    assert_eq!(
        parsed.slices[0].value,
        FilterValue::One(Scalar::Str("North America".to_string()))
    );

    assert_eq!(parsed.filters.len(), 1);
    assert_eq!(parsed.filters[0].operator, FilterOp::Gte);
    assert_eq!(
        parsed.filters[0].value,
        FilterValue::One(Scalar::Number(2023.0))
    );
}

#[test]
fn test_axis_without_level_defers_to_normalizer() {
    let parsed = shorthand::parse("ROWS geography").unwrap();
    assert_eq!(parsed.rows, vec![AxisInput::new("geography")]);
}

#[test]
fn test_dice_produces_in_filter() {
    let parsed = shorthand::parse("DICE time.quarter IN (Q1, Q2)").unwrap();

    assert_eq!(parsed.dices.len(), 1);
    assert_eq!(parsed.dices[0].dimension, "time");
    assert_eq!(parsed.dices[0].level.as_deref(), Some("quarter"));
    assert_eq!(parsed.dices[0].operator, FilterOp::In);
    assert_eq!(
        parsed.dices[0].value,
        FilterValue::Many(vec![
            Scalar::Str("Q1".to_string()),
            Scalar::Str("Q2".to_string()),
        ])
    );
}

#[test]
fn test_unquoted_numbers_become_numbers() {
    let parsed = shorthand::parse("SLICE time.year = 2023").unwrap();
    assert_eq!(
        parsed.slices[0].value,
        FilterValue::One(Scalar::Number(2023.0))
    );

    let quoted = shorthand::parse("SLICE time.year = '2023'").unwrap();
    assert_eq!(
        quoted.slices[0].value,
        FilterValue::One(Scalar::Str("2023".to_string()))
    );
}

#[test]
fn test_drill_with_and_without_path() {
    let with_path = shorthand::parse("DRILL time year -> month PATH 2023, Q1").unwrap();
    let drill = with_path.drill.unwrap();
    assert_eq!(drill.dimension, "time");
    assert_eq!(drill.from_level, "year");
    assert_eq!(drill.to_level, "month");
    assert_eq!(
        drill.path,
        vec![Scalar::Number(2023.0), Scalar::Str("Q1".to_string())]
    );

    let bare = shorthand::parse("DRILL time year to month").unwrap();
    assert!(bare.drill.unwrap().path.is_empty());
}

#[test]
fn test_rollup_clause() {
    let parsed = shorthand::parse("ROLLUP time quarter").unwrap();
    let rollup = parsed.rollup.unwrap();
    assert_eq!(rollup.dimension, "time");
    assert_eq!(rollup.level, "quarter");
}

#[test]
fn test_empty_clauses_and_trailing_semicolons_are_fine() {
    let parsed = shorthand::parse("MEASURES revenue;;  ;").unwrap();
    assert_eq!(parsed.measures, vec!["revenue"]);
}

#[test]
fn test_empty_measures_clause_is_silently_empty() {
    let parsed = shorthand::parse("MEASURES").unwrap();
    assert!(parsed.measures.is_empty());
}

#[test]
fn test_unknown_keyword_is_a_bad_request() {
    let err = shorthand::parse("ORDER BY revenue").unwrap_err();
    assert!(matches!(err, EngineError::ShorthandSyntax { .. }));
    assert_eq!(err.status_class(), 400);
}

#[test]
fn test_malformed_filter_is_a_bad_request() {
    let err = shorthand::parse("FILTER time.year ~ 2023").unwrap_err();
    assert!(matches!(err, EngineError::ShorthandSyntax { .. }));
}

#[test]
fn test_empty_dice_list_is_rejected() {
    let err = shorthand::parse("DICE time.quarter IN ()").unwrap_err();
    assert!(matches!(err, EngineError::ShorthandSyntax { .. }));
}
