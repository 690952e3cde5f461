//! Undo records and the repetition table.

use std::collections::HashMap;

use chess_core::Piece;

use crate::{Context, LegalMove};

/// Everything needed to take one move back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UndoRecord {
    pub(crate) mv: LegalMove,
    pub(crate) captured: Option<Piece>,
    /// Context before the move, memoized values included.
    pub(crate) context: Context,
    pub(crate) key: u64,
}

/// How often each position key has occurred in the current game line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occurrences of `key`.
    #[inline]
    pub fn count(&self, key: u64) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    pub(crate) fn increment(&mut self, key: u64) -> u32 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Removes one occurrence; entries that drop to zero are removed entirely.
    pub(crate) fn decrement(&mut self, key: u64) {
        if let Some(count) = self.counts.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&key);
            }
        }
    }

    /// Number of distinct positions recorded.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
