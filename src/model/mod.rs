//! The cube data model: scalars, definitions, query payloads, and results.

pub mod cube;
pub mod query;
pub mod result;
pub mod types;

pub use cube::{CubeDefinition, Dimension, FactRow, Measure};
pub use types::{AggregationKind, Scalar};
