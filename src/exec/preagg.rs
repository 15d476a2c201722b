//! Pre-aggregate fast path.
//!
//! A single-row-axis query with no predicates reads its cells straight from
//! the store materialized at registration: one row per distinct value at
//! (dimension, level), ordered by the canonical comparator, under a single
//! synthetic "All" column.

use crate::model::result::{Coordinate, MeasureSeries, PivotHeader};
use crate::model::types::canonical_cmp;
use crate::query::NormalizedQuery;
use crate::registry::preagg::PreAggCell;
use crate::registry::CubeInstance;

use super::PivotOutput;

pub fn execute(cube: &CubeInstance, query: &NormalizedQuery) -> PivotOutput {
    let columns = vec![PivotHeader::from_coordinates(Vec::new())];

    let Some(axis) = query.rows.first() else {
        return PivotOutput {
            rows: Vec::new(),
            columns,
            measures: empty_series(query),
            populated: Vec::new(),
        };
    };

    let mut cells: Vec<&PreAggCell> = cube
        .preagg
        .level_cells(&axis.dimension, &axis.level)
        .map(|by_value| by_value.values().collect())
        .unwrap_or_default();
    cells.sort_by(|a, b| canonical_cmp(&a.value, &b.value));

    let rows: Vec<PivotHeader> = cells
        .iter()
        .map(|cell| {
            PivotHeader::from_coordinates(vec![Coordinate {
                dimension: axis.dimension.clone(),
                level: axis.level.clone(),
                value: cell.value.clone(),
            }])
        })
        .collect();

    let measures = query
        .measures
        .iter()
        .map(|name| MeasureSeries {
            name: name.clone(),
            values: cells
                .iter()
                .map(|cell| vec![cell.measures.get(name).copied().unwrap_or(0.0)])
                .collect(),
        })
        .collect();

    let populated = (0..rows.len()).map(|r| (r, 0)).collect();

    PivotOutput {
        rows,
        columns,
        measures,
        populated,
    }
}

fn empty_series(query: &NormalizedQuery) -> Vec<MeasureSeries> {
    query
        .measures
        .iter()
        .map(|name| MeasureSeries {
            name: name.clone(),
            values: Vec::new(),
        })
        .collect()
}
