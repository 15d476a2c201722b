//! Bounded LRU result cache with per-entry TTL.
//!
//! Keyed by the canonical fingerprint of `{cube, normalized query, plan}`
//! (see [`fingerprint`]). Entries are created on miss, evicted on capacity
//! (least recently used first), on TTL expiry, or explicitly per cube by an
//! external invalidation trigger. All mutation happens under one mutex;
//! nothing in here blocks on I/O.

pub mod fingerprint;

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CacheConfig;
use crate::model::result::QueryResponse;

/// Hit/miss counters plus current residency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

#[derive(Debug, Clone)]
struct CacheSlot {
    response: QueryResponse,
    stored_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheSlot>,
    /// Recency order, least recent first.
    recency: VecDeque<String>,
    hits: u64,
    misses: u64,
}

/// Process-wide result cache.
#[derive(Debug)]
pub struct ResultCache {
    state: Mutex<CacheState>,
    max: usize,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            max: config.max,
            ttl: Duration::from_millis(config.ttl_ms),
        }
    }

    /// Fetch a live entry. A hit bumps the entry's recency and the hit
    /// counter; an expired entry is dropped and reported as absent. The
    /// miss counter is not touched here: [`Self::store`] counts the miss
    /// once a result was actually produced, so failed queries never skew
    /// the numbers.
    pub fn lookup(&self, key: &str) -> Option<QueryResponse> {
        let mut state = self.state.lock();

        let live = match state.entries.get(key) {
            Some(slot) if slot.stored_at.elapsed() <= self.ttl => Some(slot.response.clone()),
            Some(_) => None, // expired
            None => return None,
        };

        match live {
            Some(response) => {
                state.hits += 1;
                touch(&mut state.recency, key);
                Some(response)
            }
            None => {
                state.entries.remove(key);
                state.recency.retain(|k| k != key);
                None
            }
        }
    }

    /// Insert a freshly computed result, evicting least-recently-used
    /// entries beyond capacity, and count the miss that produced it.
    pub fn store(&self, key: String, response: QueryResponse) {
        let mut state = self.state.lock();
        state.misses += 1;

        let replaced = state
            .entries
            .insert(
                key.clone(),
                CacheSlot {
                    response,
                    stored_at: Instant::now(),
                },
            )
            .is_some();
        if replaced {
            state.recency.retain(|k| k != &key);
        }
        state.recency.push_back(key);

        while state.entries.len() > self.max {
            let Some(oldest) = state.recency.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
        }
    }

    /// Remaining lifetime of a live entry, in milliseconds.
    pub fn remaining_ttl_ms(&self, key: &str) -> Option<u64> {
        let state = self.state.lock();
        let slot = state.entries.get(key)?;
        let elapsed = slot.stored_at.elapsed();
        if elapsed > self.ttl {
            return None;
        }
        Some((self.ttl - elapsed).as_millis() as u64)
    }

    /// Evict every entry for a cube; keys carry the cube name as a prefix.
    /// Returns the number of entries removed.
    pub fn invalidate_cube(&self, cube: &str) -> usize {
        let prefix = format!("{}:", cube);
        let mut state = self.state.lock();

        let before = state.entries.len();
        state.entries.retain(|key, _| !key.starts_with(&prefix));
        state.recency.retain(|key| !key.starts_with(&prefix));
        let evicted = before - state.entries.len();

        if evicted > 0 {
            debug!(cube, evicted, "cache entries invalidated");
        }
        evicted
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            size: state.entries.len(),
        }
    }
}

fn touch(recency: &mut VecDeque<String>, key: &str) {
    recency.retain(|k| k != key);
    recency.push_back(key.to_string());
}
