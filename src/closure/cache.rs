use std::collections::HashMap;

use crate::closure::pattern::Pattern;
use crate::io::error::Result;
use crate::model::Time;

/// Key for caching pattern probabilities
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PatternKey {
    time: Time,
    pattern: Pattern,
}

impl PatternKey {
    /// Create a key for `pattern` at `time`
    pub const fn new(time: Time, pattern: Pattern) -> Self {
        Self { time, pattern }
    }
}

/// Memoization cache for pattern probabilities
///
/// Entries are written once and never overwritten; lookups never change a result.
#[derive(Default)]
pub struct PatternCache {
    /// Pattern to probability mapping
    pattern_cache: HashMap<PatternKey, f64>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl PatternCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.pattern_cache.len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.pattern_cache.is_empty()
    }

    /// Retrieve cached result or compute and store new one
    ///
    /// Failed computations are not stored.
    ///
    /// # Errors
    ///
    /// Propagates the error of `compute_fn`.
    pub fn get_or_try_compute<F>(&mut self, key: PatternKey, compute_fn: F) -> Result<f64>
    where
        F: FnOnce() -> Result<f64>,
    {
        use std::collections::hash_map::Entry;

        match self.pattern_cache.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                Ok(*entry.get())
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                Ok(*entry.insert(compute_fn()?))
            }
        }
    }
}

/// Append-only table of per-time layers filled bottom-up from time 0
///
/// Layer `t` is derived from layer `t - 1` only, so filling the table
/// iteratively needs no recursion however far ahead a query lies.
#[derive(Debug, Clone)]
pub struct TimeTable<L> {
    layers: Vec<L>,
}

impl<L> Default for TimeTable<L> {
    fn default() -> Self {
        Self { layers: Vec::new() }
    }
}

impl<L> TimeTable<L> {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of filled time steps
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no time step has been filled
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layer for `time`, if already filled
    pub fn get(&self, time: Time) -> Option<&L> {
        self.layers.get(time)
    }

    /// Most recently filled layer
    pub fn latest(&self) -> Option<&L> {
        self.layers.last()
    }

    /// Append the layer for the next time step
    pub fn push(&mut self, layer: L) {
        self.layers.push(layer);
    }
}
