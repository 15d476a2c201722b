//! Raw fact scan: filter evaluation, drill-path binding, and per-cell
//! accumulation.

use std::collections::HashMap;

use crate::aggregate::{accumulator_for, Accumulator};
use crate::model::cube::{FactRow, Measure};
use crate::model::query::{FilterOp, FilterValue};
use crate::model::result::{Coordinate, MeasureSeries};
use crate::model::types::Scalar;
use crate::query::{AxisSpec, DrillSpec, FilterSpec, NormalizedQuery};
use crate::registry::CubeInstance;

use super::pivot::HeaderInterner;
use super::PivotOutput;

/// Stream every fact through filters and drill matching, accumulating into
/// `(row, column)` cells, then finalize into a dense matrix.
pub fn execute(cube: &CubeInstance, query: &NormalizedQuery) -> PivotOutput {
    let measures: Vec<&Measure> = query
        .measures
        .iter()
        .filter_map(|name| cube.measure(name))
        .collect();
    let drill = query
        .drill
        .as_ref()
        .map(|d| drill_predicate(cube, d))
        .unwrap_or_default();

    let mut row_headers = HeaderInterner::default();
    let mut column_headers = HeaderInterner::default();
    // (row, column) → one accumulator per requested measure
    let mut cells: HashMap<(usize, usize), Vec<Box<dyn Accumulator>>> = HashMap::new();

    for fact in &cube.definition.facts {
        if !query.filters.iter().all(|f| filter_matches(f, fact)) {
            continue;
        }
        if !drill.matches(fact) {
            continue;
        }

        let row = row_headers.intern(coordinates(&query.rows, fact));
        let column = column_headers.intern(coordinates(&query.columns, fact));

        let accumulators = cells.entry((row, column)).or_insert_with(|| {
            measures
                .iter()
                .map(|m| accumulator_for(m.aggregation))
                .collect()
        });
        for (measure, acc) in measures.iter().zip(accumulators.iter_mut()) {
            if let Some(value) = fact.metric(&measure.value_field) {
                acc.add(value);
            }
        }
    }

    let mut series: Vec<MeasureSeries> = query
        .measures
        .iter()
        .map(|name| MeasureSeries {
            name: name.clone(),
            values: vec![vec![0.0; column_headers.len()]; row_headers.len()],
        })
        .collect();
    for ((row, column), accumulators) in &cells {
        for (m, acc) in accumulators.iter().enumerate() {
            series[m].values[*row][*column] = acc.finalize();
        }
    }

    let mut populated: Vec<(usize, usize)> = cells.keys().copied().collect();
    populated.sort_unstable();

    PivotOutput {
        rows: row_headers.into_headers(),
        columns: column_headers.into_headers(),
        measures: series,
        populated,
    }
}

/// Coordinate tuple for a fact along the given axes; a missing value at an
/// axis level maps to the "All" sentinel.
fn coordinates(axes: &[AxisSpec], fact: &FactRow) -> Vec<Coordinate> {
    axes.iter()
        .map(|axis| Coordinate {
            dimension: axis.dimension.clone(),
            level: axis.level.clone(),
            value: fact
                .coordinate(&axis.dimension, &axis.level)
                .cloned()
                .unwrap_or_else(Scalar::all),
        })
        .collect()
}

fn filter_matches(filter: &FilterSpec, fact: &FactRow) -> bool {
    let actual = fact.coordinate(&filter.dimension, &filter.level);

    match (filter.operator, &filter.value) {
        (FilterOp::Eq, FilterValue::One(expected)) => actual == Some(expected),
        (FilterOp::Neq, FilterValue::One(expected)) => actual != Some(expected),
        (FilterOp::In, FilterValue::Many(values)) => {
            actual.is_some_and(|a| values.contains(a))
        }
        (FilterOp::Nin, FilterValue::Many(values)) => {
            !actual.is_some_and(|a| values.contains(a))
        }
        (FilterOp::Between, FilterValue::Many(bounds)) => {
            let (Some(a), Some(low), Some(high)) = (
                actual.and_then(Scalar::as_number),
                bounds.first().and_then(Scalar::as_number),
                bounds.get(1).and_then(Scalar::as_number),
            ) else {
                return false;
            };
            low <= a && a <= high
        }
        (op, FilterValue::One(expected)) => {
            // Remaining operators are the numeric comparisons; a non-numeric
            // side fails the predicate.
            let (Some(a), Some(e)) = (actual.and_then(Scalar::as_number), expected.as_number())
            else {
                return false;
            };
            match op {
                FilterOp::Gt => a > e,
                FilterOp::Gte => a >= e,
                FilterOp::Lt => a < e,
                FilterOp::Lte => a <= e,
                _ => false,
            }
        }
        _ => false,
    }
}

/// The (level, value) pairs a drill path pins, starting at the coarser end
/// of the drilled range. An empty path matches everything.
#[derive(Debug, Default)]
struct DrillPredicate {
    dimension: String,
    bindings: Vec<(String, Scalar)>,
}

impl DrillPredicate {
    fn matches(&self, fact: &FactRow) -> bool {
        self.bindings.iter().all(|(level, expected)| {
            fact.coordinate(&self.dimension, level)
                .is_some_and(|actual| path_value_eq(actual, expected))
        })
    }
}

fn drill_predicate(cube: &CubeInstance, drill: &DrillSpec) -> DrillPredicate {
    let mut predicate = DrillPredicate {
        dimension: drill.dimension.clone(),
        bindings: Vec::new(),
    };
    if drill.path.is_empty() {
        return predicate;
    }
    let Some(dim) = cube.dimension(&drill.dimension) else {
        return predicate;
    };
    let (Some(from), Some(to)) = (
        dim.level_index(&drill.from_level),
        dim.level_index(&drill.to_level),
    ) else {
        return predicate;
    };

    let start = from.min(to);
    let range_len = from.abs_diff(to) + 1;
    predicate.bindings = drill
        .path
        .iter()
        .take(range_len)
        .enumerate()
        .filter_map(|(i, value)| {
            dim.hierarchy
                .get(start + i)
                .map(|level| (level.clone(), value.clone()))
        })
        .collect();
    predicate
}

/// Path comparisons are numeric when both sides are numbers and stringified
/// otherwise, so a path value 2023 matches a fact value "2023".
fn path_value_eq(a: &Scalar, b: &Scalar) -> bool {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x == y,
        _ => a.key_string() == b.key_string(),
    }
}
