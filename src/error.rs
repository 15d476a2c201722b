//! Engine error types.
//!
//! Every failure the core can surface is a variant here, each mapped to an
//! HTTP-style status class so a transport can translate without matching on
//! message strings. The core never retries and never returns partial
//! results: any error aborts the query before the cache or its counters are
//! touched.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Unified error type for the cube engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("cube '{name}' is not registered")]
    CubeNotFound { name: String },

    #[error("cube '{name}' is already registered")]
    DuplicateCube { name: String },

    #[error("cube '{cube}' defines no dimensions")]
    EmptyDimensions { cube: String },

    #[error("dimension '{dimension}' has an empty hierarchy")]
    EmptyHierarchy { dimension: String },

    #[error("duplicate dimension '{dimension}'")]
    DuplicateDimension { dimension: String },

    #[error("duplicate level '{level}' in dimension '{dimension}'")]
    DuplicateLevel { dimension: String, level: String },

    #[error("duplicate measure '{measure}'")]
    DuplicateMeasure { measure: String },

    #[error("measure '{measure}' reads value field '{field}', which no fact row carries")]
    UnknownValueField { measure: String, field: String },

    #[error("unknown dimension '{dimension}'")]
    UnknownDimension { dimension: String },

    #[error("unknown level '{level}' in dimension '{dimension}'")]
    UnknownLevel { dimension: String, level: String },

    #[error("unknown measure '{measure}'")]
    UnknownMeasure { measure: String },

    #[error("query names no measures")]
    EmptyMeasures,

    #[error("invalid filter: {message}")]
    InvalidFilter { message: String },

    #[error("invalid drill: {message}")]
    InvalidDrill { message: String },

    #[error("invalid rollup: {message}")]
    InvalidRollup { message: String },

    #[error("shorthand clause '{clause}': {message}")]
    ShorthandSyntax { clause: String, message: String },

    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Numeric status class for transports (404, 400, or 500).
    pub fn status_class(&self) -> u16 {
        match self {
            EngineError::CubeNotFound { .. } => 404,
            EngineError::Internal { .. } => 500,
            _ => 400,
        }
    }
}
