//! The engine facade: registration, execution, caching, and invalidation.
//!
//! A [`CubeEngine`] owns the cube registry, the result cache, and the
//! invalidation hooks. Every method takes `&self`, so one instance serves
//! concurrent requests; share it behind an `Arc`. `execute` is synchronous
//! and runs to completion once started; callers that need a timeout wrap
//! it externally.

use std::time::SystemTime;

use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::cache::{fingerprint, CacheStats, ResultCache};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::exec;
use crate::model::cube::CubeDefinition;
use crate::model::query::QueryPayload;
use crate::model::result::{CacheStatus, QueryResponse, ResponseMetadata};
use crate::planner;
use crate::query;
use crate::registry::CubeRegistry;
use crate::response;

/// Notification emitted when a cube's cache entries are evicted, so an
/// external data loader can observe its own invalidations.
#[derive(Debug, Clone)]
pub struct InvalidationEvent {
    pub id: Uuid,
    pub cube: String,
    pub reason: String,
    /// Cache entries removed by this invalidation.
    pub evicted: usize,
    pub at: SystemTime,
}

type InvalidationListener = Box<dyn Fn(&InvalidationEvent) + Send + Sync>;

/// An OLAP cube engine instance.
pub struct CubeEngine {
    registry: CubeRegistry,
    cache: ResultCache,
    listeners: Mutex<Vec<InvalidationListener>>,
    events: Mutex<Vec<InvalidationEvent>>,
}

impl CubeEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: CubeRegistry::new(),
            cache: ResultCache::new(&config.cache),
            listeners: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        })
    }

    /// Register a cube and materialize its pre-aggregates. Re-registration
    /// of an existing name is an error; registered cubes are immutable.
    pub fn register_cube(&self, definition: CubeDefinition) -> EngineResult<()> {
        self.registry.register(definition)?;
        Ok(())
    }

    /// Names of every registered cube, sorted.
    pub fn list_cubes(&self) -> Vec<String> {
        self.registry.list()
    }

    /// Execute a query end to end: normalize, plan, serve from cache or run
    /// the plan, then decorate. Any failure surfaces before the cache or
    /// its counters are touched.
    pub fn execute(&self, payload: &QueryPayload) -> EngineResult<QueryResponse> {
        let cube = self
            .registry
            .get(&payload.cube)
            .ok_or_else(|| EngineError::CubeNotFound {
                name: payload.cube.clone(),
            })?;

        let normalized = query::normalize(payload, &cube)?;
        let plan = planner::plan(&normalized);
        let key = fingerprint::cache_key(&normalized, &plan)?;

        if let Some(mut cached) = self.cache.lookup(&key) {
            debug!(cube = %normalized.cube, key = %key, "cache hit");
            // The cached payload is returned verbatim; only the cache block
            // is re-stamped.
            cached.metadata.cache = CacheStatus {
                hit: true,
                key: key.clone(),
                ttl_remaining_ms: self.cache.remaining_ttl_ms(&key),
                stats: self.cache.stats(),
            };
            return Ok(cached);
        }

        debug!(cube = %normalized.cube, strategy = %plan.strategy, "executing query");
        let data = exec::execute(&cube, &normalized, &plan);

        let mut response = QueryResponse {
            data,
            metadata: ResponseMetadata {
                cube: normalized.cube.clone(),
                measures: normalized.measures.clone(),
                available_measures: response::available_measures(&cube),
                breadcrumbs: response::breadcrumbs(&cube, normalized.drill.as_ref()),
                cache: CacheStatus {
                    hit: false,
                    key: key.clone(),
                    ttl_remaining_ms: None,
                    stats: CacheStats::default(),
                },
                planner: plan,
                suggestions: response::suggestions(&normalized),
            },
        };

        self.cache.store(key.clone(), response.clone());
        response.metadata.cache = CacheStatus {
            hit: false,
            key: key.clone(),
            ttl_remaining_ms: self.cache.remaining_ttl_ms(&key),
            stats: self.cache.stats(),
        };
        Ok(response)
    }

    /// Evict a cube's cache entries and notify invalidation listeners.
    pub fn invalidate_cube(&self, name: &str, reason: &str) -> EngineResult<InvalidationEvent> {
        if !self.registry.contains(name) {
            return Err(EngineError::CubeNotFound {
                name: name.to_string(),
            });
        }

        let evicted = self.cache.invalidate_cube(name);
        let event = InvalidationEvent {
            id: Uuid::new_v4(),
            cube: name.to_string(),
            reason: reason.to_string(),
            evicted,
            at: SystemTime::now(),
        };
        debug!(cube = name, reason, evicted, "cube invalidated");

        self.events.lock().push(event.clone());
        for listener in self.listeners.lock().iter() {
            listener(&event);
        }
        Ok(event)
    }

    /// Subscribe to invalidation events. Listeners run synchronously inside
    /// `invalidate_cube`, after eviction.
    pub fn on_invalidation<F>(&self, listener: F)
    where
        F: Fn(&InvalidationEvent) + Send + Sync + 'static,
    {
        self.listeners.lock().push(Box::new(listener));
    }

    /// Recorded invalidation history, oldest first.
    pub fn invalidation_events(&self) -> Vec<InvalidationEvent> {
        self.events.lock().clone()
    }

    /// Cache counters, for diagnostics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
