//! Cube registry: owns registered cube definitions and their
//! pre-aggregates.
//!
//! Registration validates the definition, materializes pre-aggregates, and
//! stores an immutable [`CubeInstance`]. Reads share the lock; `register`
//! takes it exclusively. Instances never change after insertion, so a query
//! holding an `Arc<CubeInstance>` sees one consistent snapshot for its whole
//! lifetime.

pub mod preagg;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::model::cube::{CubeDefinition, Dimension, Measure};

use self::preagg::PreAggStore;

/// A registered cube: definition, lookup indexes, pre-aggregates.
#[derive(Debug)]
pub struct CubeInstance {
    pub definition: CubeDefinition,
    dimension_index: HashMap<String, usize>,
    measure_index: HashMap<String, usize>,
    pub preagg: PreAggStore,
}

impl CubeInstance {
    fn new(definition: CubeDefinition) -> Self {
        let dimension_index = definition
            .dimensions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        let measure_index = definition
            .measures
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        let preagg = PreAggStore::build(&definition);

        Self {
            definition,
            dimension_index,
            measure_index,
            preagg,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimension_index
            .get(name)
            .map(|&i| &self.definition.dimensions[i])
    }

    pub fn measure(&self, name: &str) -> Option<&Measure> {
        self.measure_index
            .get(name)
            .map(|&i| &self.definition.measures[i])
    }
}

/// Process-wide cube store.
#[derive(Debug, Default)]
pub struct CubeRegistry {
    cubes: RwLock<HashMap<String, Arc<CubeInstance>>>,
}

impl CubeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a cube, materializing its pre-aggregates.
    pub fn register(&self, definition: CubeDefinition) -> EngineResult<Arc<CubeInstance>> {
        validate_definition(&definition)?;

        let mut cubes = self.cubes.write();
        if cubes.contains_key(&definition.name) {
            return Err(EngineError::DuplicateCube {
                name: definition.name,
            });
        }

        let name = definition.name.clone();
        let instance = Arc::new(CubeInstance::new(definition));
        debug!(
            cube = %name,
            facts = instance.definition.facts.len(),
            preagg_levels = instance.preagg.len(),
            "cube registered"
        );
        cubes.insert(name, Arc::clone(&instance));
        Ok(instance)
    }

    pub fn get(&self, name: &str) -> Option<Arc<CubeInstance>> {
        self.cubes.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cubes.read().contains_key(name)
    }

    /// Registered cube names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cubes.read().keys().cloned().collect();
        names.sort();
        names
    }
}

fn validate_definition(def: &CubeDefinition) -> EngineResult<()> {
    if def.dimensions.is_empty() {
        return Err(EngineError::EmptyDimensions {
            cube: def.name.clone(),
        });
    }

    let mut dimension_names = HashSet::new();
    for dim in &def.dimensions {
        if !dimension_names.insert(dim.name.as_str()) {
            return Err(EngineError::DuplicateDimension {
                dimension: dim.name.clone(),
            });
        }
        if dim.hierarchy.is_empty() {
            return Err(EngineError::EmptyHierarchy {
                dimension: dim.name.clone(),
            });
        }
        let mut levels = HashSet::new();
        for level in &dim.hierarchy {
            if !levels.insert(level.as_str()) {
                return Err(EngineError::DuplicateLevel {
                    dimension: dim.name.clone(),
                    level: level.clone(),
                });
            }
        }
    }

    let mut measure_names = HashSet::new();
    for measure in &def.measures {
        if !measure_names.insert(measure.name.as_str()) {
            return Err(EngineError::DuplicateMeasure {
                measure: measure.name.clone(),
            });
        }
        // A value field nothing carries would silently aggregate to zero
        // everywhere; reject it while the definition is in hand.
        let carried = def
            .facts
            .iter()
            .any(|f| f.metrics.contains_key(&measure.value_field));
        if !def.facts.is_empty() && !carried {
            return Err(EngineError::UnknownValueField {
                measure: measure.name.clone(),
                field: measure.value_field.clone(),
            });
        }
    }

    Ok(())
}
