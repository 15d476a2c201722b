//! Response decoration: breadcrumbs, visualization suggestions, and
//! measure metadata.

use crate::model::result::{Breadcrumb, MeasureInfo};
use crate::query::{DrillSpec, NormalizedQuery};
use crate::registry::CubeInstance;

/// Pair each drill-path value with consecutive levels of the drilled range,
/// starting at the coarser end.
pub fn breadcrumbs(cube: &CubeInstance, drill: Option<&DrillSpec>) -> Vec<Breadcrumb> {
    let Some(drill) = drill else {
        return Vec::new();
    };
    let Some(dim) = cube.dimension(&drill.dimension) else {
        return Vec::new();
    };
    let (Some(from), Some(to)) = (
        dim.level_index(&drill.from_level),
        dim.level_index(&drill.to_level),
    ) else {
        return Vec::new();
    };

    let start = from.min(to);
    drill
        .path
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            dim.hierarchy.get(start + i).map(|level| Breadcrumb {
                dimension: drill.dimension.clone(),
                level: level.clone(),
                value: value.clone(),
            })
        })
        .collect()
}

/// Chart suggestions, a deterministic function of axis shape and measure
/// count. A one-sided pivot is rendered the same way whichever side carries
/// its axes, so the columns-only buckets mirror the rows-only ones.
pub fn suggestions(query: &NormalizedQuery) -> Vec<String> {
    let picks: &[&str] = match (query.rows.len(), query.columns.len()) {
        (0, 0) => {
            if query.measures.len() == 1 {
                &["big-number"]
            } else {
                &["multi-stat"]
            }
        }
        (1, 0) | (0, 1) => &["column", "line"],
        (_, 0) | (0, _) => &["matrix", "line"],
        _ => &["heatmap", "stacked-bar"],
    };
    picks.iter().map(|s| s.to_string()).collect()
}

/// Every measure the cube offers, for `metadata.availableMeasures`.
pub fn available_measures(cube: &CubeInstance) -> Vec<MeasureInfo> {
    cube.definition
        .measures
        .iter()
        .map(|m| MeasureInfo {
            name: m.name.clone(),
            label: m.label.clone(),
            aggregation: m.aggregation,
            format: m.format.clone(),
        })
        .collect()
}
