//! # Cuboid
//!
//! An in-memory OLAP cube engine for analytics UIs and notebook clients.
//!
//! ## Architecture
//!
//! Cubes register once with dimensions, measures, and fact rows; queries
//! pivot over them:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │       Query payload (+ optional `mdx` shorthand)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [normalizer]
//! ┌─────────────────────────────────────────────────────────┐
//! │   NormalizedQuery (resolved axes, merged filter list)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner]
//! ┌─────────────────────────────────────────────────────────┐
//! │        pre-aggregate fast path  |  raw fact scan         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [executor + assembler]
//! ┌─────────────────────────────────────────────────────────┐
//! │  pivot headers + dense matrix + flat rows + metadata     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Results land in a bounded LRU cache keyed by a canonical fingerprint of
//! `{cube, normalized query, plan}`; an external data loader can evict a
//! cube's entries through [`engine::CubeEngine::invalidate_cube`].

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod model;
pub mod planner;
pub mod query;
pub mod registry;
pub mod response;

pub use engine::{CubeEngine, InvalidationEvent};
pub use error::{EngineError, EngineResult};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{CacheConfig, EngineConfig};
    pub use crate::engine::{CubeEngine, InvalidationEvent};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::model::cube::{CubeDefinition, Dimension, FactRow, Measure};
    pub use crate::model::query::{
        AxisInput, DrillInput, FilterInput, FilterOp, FilterValue, PivotInput, QueryPayload,
        RollupInput, SortDirection,
    };
    pub use crate::model::result::{QueryData, QueryResponse};
    pub use crate::model::types::{AggregationKind, Scalar};
    pub use crate::planner::{PlanDecision, PlanStrategy};
}
