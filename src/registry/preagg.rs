//! Per-(dimension, level) pre-aggregate materialization.
//!
//! Built in one pass over the fact rows at registration time, finalized
//! immediately, and never updated afterwards.

use std::collections::HashMap;

use crate::aggregate::{accumulator_for, Accumulator};
use crate::model::cube::CubeDefinition;
use crate::model::types::Scalar;

/// Finalized measures for one distinct (dimension, level) value.
#[derive(Debug, Clone)]
pub struct PreAggCell {
    pub value: Scalar,
    pub measures: HashMap<String, f64>,
}

/// Map (dimension, level) → value key → finalized cell.
#[derive(Debug, Default)]
pub struct PreAggStore {
    cells: HashMap<(String, String), HashMap<String, PreAggCell>>,
}

impl PreAggStore {
    /// Materialize every level of every dimension from the definition's
    /// facts. Facts that carry no value at a level simply don't contribute
    /// to that level's entries.
    pub fn build(def: &CubeDefinition) -> Self {
        type Work = HashMap<String, (Scalar, Vec<Box<dyn Accumulator>>)>;
        let mut work: HashMap<(String, String), Work> = HashMap::new();

        for fact in &def.facts {
            for dim in &def.dimensions {
                for level in &dim.hierarchy {
                    let Some(value) = fact.coordinate(&dim.name, level) else {
                        continue;
                    };

                    let slot = work
                        .entry((dim.name.clone(), level.clone()))
                        .or_default()
                        .entry(value.key_string())
                        .or_insert_with(|| {
                            let accumulators = def
                                .measures
                                .iter()
                                .map(|m| accumulator_for(m.aggregation))
                                .collect();
                            (value.clone(), accumulators)
                        });

                    for (measure, acc) in def.measures.iter().zip(slot.1.iter_mut()) {
                        if let Some(metric) = fact.metric(&measure.value_field) {
                            acc.add(metric);
                        }
                    }
                }
            }
        }

        let mut cells = HashMap::new();
        for (key, by_value) in work {
            let finalized = by_value
                .into_iter()
                .map(|(value_key, (value, accumulators))| {
                    let measures = def
                        .measures
                        .iter()
                        .zip(accumulators.iter())
                        .map(|(m, acc)| (m.name.clone(), acc.finalize()))
                        .collect();
                    (value_key, PreAggCell { value, measures })
                })
                .collect();
            cells.insert(key, finalized);
        }

        Self { cells }
    }

    /// All cells for (dimension, level), unordered.
    pub fn level_cells(&self, dimension: &str, level: &str) -> Option<&HashMap<String, PreAggCell>> {
        self.cells.get(&(dimension.to_string(), level.to_string()))
    }

    /// Number of (dimension, level) entries materialized.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
