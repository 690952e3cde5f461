//! Transposition cache owned by a searcher.
//!
//! Entries are keyed by the position key (placement, side to move, castling
//! rights and en-passant file) together with the remaining search depth, so
//! a hit always comes from a subtree of exactly the same size.

use std::collections::HashMap;

use chess_engine::LegalMove;
use tracing::trace;

/// How a cached value relates to the true value of its subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The value is exact.
    Exact,
    /// The search failed high: the true value is at least this.
    Lower,
    /// The search failed low: the true value is at most this.
    Upper,
}

/// A cached search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub value: i32,
    pub bound: Bound,
    pub line: Vec<LegalMove>,
}

impl CacheEntry {
    /// Returns the entry if it settles a search of the window `(alpha, beta)`.
    pub fn cutoff(&self, alpha: i32, beta: i32) -> Option<&CacheEntry> {
        let usable = match self.bound {
            Bound::Exact => true,
            Bound::Lower => self.value >= beta,
            Bound::Upper => self.value <= alpha,
        };
        usable.then_some(self)
    }
}

/// Bounded map from `(position key, depth)` to search results.
///
/// When full, the whole cache is dropped rather than evicting single entries.
#[derive(Debug, Clone)]
pub struct TranspositionCache {
    entries: HashMap<(u64, u32), CacheEntry>,
    capacity: usize,
}

impl TranspositionCache {
    pub fn new(capacity: usize) -> Self {
        TranspositionCache {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn probe(&self, key: u64, depth: u32) -> Option<&CacheEntry> {
        self.entries.get(&(key, depth))
    }

    pub fn store(&mut self, key: u64, depth: u32, entry: CacheEntry) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&(key, depth)) {
            trace!(capacity = self.capacity, "transposition cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert((key, depth), entry);
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            trace!(entries = self.entries.len(), "clearing transposition cache");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
