//! Canonical query fingerprints and cache keys.

use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::{EngineError, EngineResult};
use crate::planner::PlanDecision;
use crate::query::NormalizedQuery;

/// SHA256 hex digest of a value's canonical JSON form.
///
/// Canonicality comes from the serialization layer: `serde_json` maps keep
/// their keys sorted and struct fields emit in declaration order, so two
/// equal fingerprint documents digest identically no matter how the
/// original payload ordered its object keys. Serialization failures
/// surface as [`EngineError::Internal`].
pub fn compute_hash<T: Serialize>(value: &T) -> EngineResult<String> {
    let canonical = serde_json::to_vec(value).map_err(|e| EngineError::Internal {
        message: format!("fingerprint serialization failed: {}", e),
    })?;
    Ok(format!("{:x}", Sha256::digest(&canonical)))
}

/// Cache key for a (cube, normalized query, plan) triple.
///
/// The cube name leads as an evictable prefix; the digest covers the whole
/// fingerprint document. Keys are user-visible and stable across builds, so
/// clients may dedupe on them.
pub fn cache_key(query: &NormalizedQuery, plan: &PlanDecision) -> EngineResult<String> {
    let fingerprint = json!({
        "cube": query.cube,
        "plan": plan,
        "query": query,
    });
    Ok(format!("{}:{}", query.cube, compute_hash(&fingerprint)?))
}
