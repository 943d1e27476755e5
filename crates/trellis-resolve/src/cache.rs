use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::resolver::{ResolutionQuery, ResolutionResult};

/// Counters describing how the resolution cache has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to be computed, including every lookup while caching is disabled.
    pub misses: u64,
    /// Whole-cache invalidations.
    pub invalidations: u64,
    /// Entries currently cached.
    pub entries: usize,
}

/// Memoized resolution results keyed by structural query.
///
/// A hit takes only the shared read lock and bumps atomic counters. A miss is computed without
/// holding the lock; when two threads race on the same query the first insert wins and both
/// callers get that result.
#[derive(Debug)]
pub struct ResolutionCache {
    enabled: bool,
    entries: RwLock<HashMap<ResolutionQuery, Arc<ResolutionResult>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ResolutionCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_or_compute<E>(
        &self,
        query: &ResolutionQuery,
        compute: impl FnOnce() -> Result<ResolutionResult, E>,
    ) -> Result<Arc<ResolutionResult>, E> {
        if self.enabled {
            let cached = self.entries.read().get(query).cloned();
            if let Some(hit) = cached {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(target: "trellis.cache", "resolution cache hit");
                return Ok(hit);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(target: "trellis.cache", enabled = self.enabled, "resolution cache miss");
        let result = Arc::new(compute()?);
        if !self.enabled {
            return Ok(result);
        }
        Ok(self
            .entries
            .write()
            .entry(query.clone())
            .or_insert(result)
            .clone())
    }

    /// Drop every cached result.
    pub fn invalidate(&self) {
        let dropped = {
            let mut entries = self.entries.write();
            let dropped = entries.len();
            entries.clear();
            dropped
        };
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(target: "trellis.cache", dropped, "resolution cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Zero the counters without touching cached entries.
    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.invalidations.store(0, Ordering::Relaxed);
    }
}
