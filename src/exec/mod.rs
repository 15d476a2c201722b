//! Query execution: plan dispatch, sorting, and flattening.

pub mod pivot;
pub mod preagg;
pub mod scan;

use serde_json::Value;
use tracing::trace;

use crate::model::result::{FlatRow, MeasureSeries, PivotData, PivotHeader, QueryData};
use crate::planner::{PlanDecision, PlanStrategy};
use crate::query::NormalizedQuery;
use crate::registry::CubeInstance;

/// Raw executor output before sorting and flattening.
#[derive(Debug)]
pub struct PivotOutput {
    pub rows: Vec<PivotHeader>,
    pub columns: Vec<PivotHeader>,
    pub measures: Vec<MeasureSeries>,
    /// Cells that saw at least one observation, row-major.
    pub populated: Vec<(usize, usize)>,
}

/// Run the chosen plan and assemble the data block.
pub fn execute(cube: &CubeInstance, query: &NormalizedQuery, plan: &PlanDecision) -> QueryData {
    let output = match plan.strategy {
        PlanStrategy::PreAggregate => preagg::execute(cube, query),
        PlanStrategy::RawScan => scan::execute(cube, query),
    };
    trace!(
        rows = output.rows.len(),
        columns = output.columns.len(),
        cells = output.populated.len(),
        "plan executed"
    );
    assemble(output, query)
}

fn assemble(mut output: PivotOutput, query: &NormalizedQuery) -> QueryData {
    // Axis-level sort is a final permutation of headers and matrix.
    if let Some(order) = pivot::sort_permutation(&output.rows, &query.rows) {
        apply_row_order(&mut output, &order);
    }
    if let Some(order) = pivot::sort_permutation(&output.columns, &query.columns) {
        apply_column_order(&mut output, &order);
    }

    let flat = query.include_flattened.then(|| flatten(&output));

    QueryData {
        pivot: PivotData {
            rows: output.rows,
            columns: output.columns,
            measures: output.measures,
        },
        flat,
    }
}

/// Flat rows carry one record per populated cell: coordinate fields keyed
/// `"dim.level"`, then the finalized measure values.
fn flatten(output: &PivotOutput) -> Vec<FlatRow> {
    output
        .populated
        .iter()
        .map(|&(r, c)| {
            let mut record = FlatRow::new();
            for coord in output.rows[r]
                .coordinates
                .iter()
                .chain(output.columns[c].coordinates.iter())
            {
                record.insert(
                    format!("{}.{}", coord.dimension, coord.level),
                    Value::from(&coord.value),
                );
            }
            for series in &output.measures {
                record.insert(series.name.clone(), Value::from(series.values[r][c]));
            }
            record
        })
        .collect()
}

fn apply_row_order(output: &mut PivotOutput, order: &[usize]) {
    let inverse = inverse_permutation(order);
    output.rows = order.iter().map(|&i| output.rows[i].clone()).collect();
    for series in &mut output.measures {
        series.values = order.iter().map(|&i| series.values[i].clone()).collect();
    }
    for cell in &mut output.populated {
        cell.0 = inverse[cell.0];
    }
    output.populated.sort_unstable();
}

fn apply_column_order(output: &mut PivotOutput, order: &[usize]) {
    let inverse = inverse_permutation(order);
    output.columns = order.iter().map(|&i| output.columns[i].clone()).collect();
    for series in &mut output.measures {
        for row in &mut series.values {
            *row = order.iter().map(|&i| row[i]).collect();
        }
    }
    for cell in &mut output.populated {
        cell.1 = inverse[cell.1];
    }
    output.populated.sort_unstable();
}

fn inverse_permutation(order: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; order.len()];
    for (new, &old) in order.iter().enumerate() {
        inverse[old] = new;
    }
    inverse
}
