//! Engine configuration.
//!
//! The core's whole configuration surface is cache sizing; there are no
//! environment variables and no filesystem state.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Result cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// Maximum number of cached results.
    pub max: usize,
    /// Per-entry time to live in milliseconds.
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max: 200,
            ttl_ms: 30_000,
        }
    }
}

impl CacheConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max == 0 {
            return Err(EngineError::Configuration {
                message: "cache.max must be greater than 0".to_string(),
            });
        }
        if self.ttl_ms == 0 {
            return Err(EngineError::Configuration {
                message: "cache.ttlMs must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level engine options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cache: CacheConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        self.cache.validate()
    }

    /// Set the cache configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
}
