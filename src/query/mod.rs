//! Query normalization.
//!
//! Turns a raw [`QueryPayload`] (plus its optional shorthand) into a
//! [`NormalizedQuery`]: shorthand merged, axes resolved to concrete levels,
//! drill/rollup rewrites applied, and slices, dices, and filters collapsed
//! into one ordered predicate list. Everything downstream (planner,
//! executor, fingerprint) consumes only the normalized form.

pub mod shorthand;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::model::cube::Dimension;
use crate::model::query::{
    AxisInput, DrillInput, FilterInput, FilterOp, FilterValue, QueryPayload, RollupInput,
    SortDirection,
};
use crate::model::types::Scalar;
use crate::registry::CubeInstance;

/// A fully resolved axis: the level is always concrete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub dimension: String,
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A resolved predicate; slices, dices, and filters all land here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub dimension: String,
    pub level: String,
    pub operator: FilterOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillSpec {
    pub dimension: String,
    pub from_level: String,
    pub to_level: String,
    pub path: Vec<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupSpec {
    pub dimension: String,
    pub level: String,
}

/// The resolved query every later stage consumes. Its serialization, with
/// the plan, is what the cache fingerprint hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuery {
    pub cube: String,
    pub measures: Vec<String>,
    pub rows: Vec<AxisSpec>,
    pub columns: Vec<AxisSpec>,
    pub filters: Vec<FilterSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill: Option<DrillSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollup: Option<RollupSpec>,
    pub include_flattened: bool,
}

/// Normalize a payload against a registered cube.
pub fn normalize(payload: &QueryPayload, cube: &CubeInstance) -> EngineResult<NormalizedQuery> {
    let partial = match payload.mdx.as_deref() {
        Some(text) => shorthand::parse(text)?,
        None => shorthand::ShorthandQuery::default(),
    };

    let measures = pick_list(&payload.measures, &partial.measures);
    if measures.is_empty() {
        return Err(EngineError::EmptyMeasures);
    }
    for name in &measures {
        if cube.measure(name).is_none() {
            return Err(EngineError::UnknownMeasure {
                measure: name.clone(),
            });
        }
    }

    let drill = match payload.drill.clone().or(partial.drill) {
        Some(input) => Some(resolve_drill(&input, cube)?),
        None => None,
    };
    let rollup = match payload.rollup.clone().or(partial.rollup) {
        Some(input) => Some(resolve_rollup(&input, cube)?),
        None => None,
    };

    // Axis precedence: pivot block, then top-level, then shorthand.
    let row_inputs = payload
        .pivot
        .as_ref()
        .and_then(|p| p.rows.clone())
        .unwrap_or_else(|| pick_list(&payload.rows, &partial.rows));
    let column_inputs = payload
        .pivot
        .as_ref()
        .and_then(|p| p.columns.clone())
        .unwrap_or_else(|| pick_list(&payload.columns, &partial.columns));

    let mut rows = resolve_axes(&row_inputs, cube, drill.as_ref(), rollup.as_ref())?;
    let columns = resolve_axes(&column_inputs, cube, drill.as_ref(), rollup.as_ref())?;

    // A query with no axes at all pivots on the first dimension at its
    // coarsest level.
    if rows.is_empty() && columns.is_empty() {
        let first = &cube.definition.dimensions[0];
        rows.push(AxisSpec {
            dimension: first.name.clone(),
            level: first.hierarchy.first().cloned().unwrap_or_default(),
            sort: None,
            alias: None,
        });
    }

    let slices = pick_list(&payload.slices, &partial.slices);
    let dices = pick_list(&payload.dices, &partial.dices);
    let extra = pick_list(&payload.filters, &partial.filters);
    let mut filters = Vec::with_capacity(slices.len() + dices.len() + extra.len());
    for input in slices.iter().chain(dices.iter()).chain(extra.iter()) {
        filters.push(resolve_filter(input, cube)?);
    }

    Ok(NormalizedQuery {
        cube: cube.name().to_string(),
        measures,
        rows,
        columns,
        filters,
        drill,
        rollup,
        include_flattened: payload.include_flattened.unwrap_or(true),
    })
}

/// Structured lists win over the shorthand whenever they are non-empty.
fn pick_list<T: Clone>(structured: &[T], partial: &[T]) -> Vec<T> {
    if structured.is_empty() {
        partial.to_vec()
    } else {
        structured.to_vec()
    }
}

fn lookup_dimension<'a>(cube: &'a CubeInstance, name: &str) -> EngineResult<&'a Dimension> {
    cube.dimension(name).ok_or_else(|| EngineError::UnknownDimension {
        dimension: name.to_string(),
    })
}

fn lookup_level(dim: &Dimension, level: &str) -> EngineResult<usize> {
    dim.level_index(level).ok_or_else(|| EngineError::UnknownLevel {
        dimension: dim.name.clone(),
        level: level.to_string(),
    })
}

fn resolve_axes(
    inputs: &[AxisInput],
    cube: &CubeInstance,
    drill: Option<&DrillSpec>,
    rollup: Option<&RollupSpec>,
) -> EngineResult<Vec<AxisSpec>> {
    inputs
        .iter()
        .map(|input| resolve_axis(input, cube, drill, rollup))
        .collect()
}

fn resolve_axis(
    input: &AxisInput,
    cube: &CubeInstance,
    drill: Option<&DrillSpec>,
    rollup: Option<&RollupSpec>,
) -> EngineResult<AxisSpec> {
    let dim = lookup_dimension(cube, &input.dimension)?;

    // No explicit level means the finest one.
    let mut level = match &input.level {
        Some(level) => {
            lookup_level(dim, level)?;
            level.clone()
        }
        None => dim.hierarchy.last().cloned().unwrap_or_default(),
    };

    // A rollup coarsens any finer axis on its dimension.
    if let Some(rollup) = rollup.filter(|r| r.dimension == dim.name) {
        let axis_idx = lookup_level(dim, &level)?;
        let rollup_idx = lookup_level(dim, &rollup.level)?;
        if axis_idx > rollup_idx {
            level = rollup.level.clone();
        }
    }

    // A drill re-renders its dimension at the target level.
    if let Some(drill) = drill.filter(|d| d.dimension == dim.name) {
        level = drill.to_level.clone();
    }

    Ok(AxisSpec {
        dimension: dim.name.clone(),
        level,
        sort: input.sort,
        alias: input.alias.clone(),
    })
}

fn resolve_drill(input: &DrillInput, cube: &CubeInstance) -> EngineResult<DrillSpec> {
    let invalid = |message: String| EngineError::InvalidDrill { message };

    let dim = cube
        .dimension(&input.dimension)
        .ok_or_else(|| invalid(format!("unknown dimension '{}'", input.dimension)))?;
    let from = dim
        .level_index(&input.from_level)
        .ok_or_else(|| invalid(format!("level '{}' is not in '{}'", input.from_level, dim.name)))?;
    let to = dim
        .level_index(&input.to_level)
        .ok_or_else(|| invalid(format!("level '{}' is not in '{}'", input.to_level, dim.name)))?;

    let range_len = from.abs_diff(to) + 1;
    if input.path.len() > range_len {
        return Err(invalid(format!(
            "path carries {} values but the drilled range spans {} levels",
            input.path.len(),
            range_len
        )));
    }

    Ok(DrillSpec {
        dimension: dim.name.clone(),
        from_level: input.from_level.clone(),
        to_level: input.to_level.clone(),
        path: input.path.clone(),
    })
}

fn resolve_rollup(input: &RollupInput, cube: &CubeInstance) -> EngineResult<RollupSpec> {
    let dim = cube
        .dimension(&input.dimension)
        .ok_or_else(|| EngineError::InvalidRollup {
            message: format!("unknown dimension '{}'", input.dimension),
        })?;
    if dim.level_index(&input.level).is_none() {
        return Err(EngineError::InvalidRollup {
            message: format!("level '{}' is not in '{}'", input.level, dim.name),
        });
    }
    Ok(RollupSpec {
        dimension: dim.name.clone(),
        level: input.level.clone(),
    })
}

fn resolve_filter(input: &FilterInput, cube: &CubeInstance) -> EngineResult<FilterSpec> {
    let dim = lookup_dimension(cube, &input.dimension)?;
    let level = match &input.level {
        Some(level) => {
            lookup_level(dim, level)?;
            level.clone()
        }
        None => dim.hierarchy.last().cloned().unwrap_or_default(),
    };

    match input.operator {
        FilterOp::In | FilterOp::Nin => {
            let FilterValue::Many(values) = &input.value else {
                return Err(invalid_filter(dim, "'in'/'nin' take a list of values"));
            };
            if values.is_empty() {
                return Err(invalid_filter(dim, "'in'/'nin' take a non-empty list"));
            }
        }
        FilterOp::Between => {
            let FilterValue::Many(values) = &input.value else {
                return Err(invalid_filter(dim, "'between' takes a [low, high] pair"));
            };
            if values.len() != 2 || values.iter().any(|v| v.as_number().is_none()) {
                return Err(invalid_filter(dim, "'between' takes a numeric [low, high] pair"));
            }
        }
        FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
            let FilterValue::One(value) = &input.value else {
                return Err(invalid_filter(dim, "comparison operators take a single value"));
            };
            if value.as_number().is_none() {
                return Err(invalid_filter(dim, "comparison operators take a numeric value"));
            }
        }
        FilterOp::Eq | FilterOp::Neq => {
            if !matches!(input.value, FilterValue::One(_)) {
                return Err(invalid_filter(dim, "'eq'/'neq' take a single value"));
            }
        }
    }

    Ok(FilterSpec {
        dimension: dim.name.clone(),
        level,
        operator: input.operator,
        value: input.value.clone(),
    })
}

fn invalid_filter(dim: &Dimension, message: &str) -> EngineError {
    EngineError::InvalidFilter {
        message: format!("{} (dimension '{}')", message, dim.name),
    }
}
