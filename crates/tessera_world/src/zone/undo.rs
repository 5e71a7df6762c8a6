//! # Undo Ring
//!
//! Bounded edit history. Each entry carries exactly what is needed to invert
//! one edit. Pushing past capacity evicts the oldest entry; evicted history
//! is gone for good.

use std::collections::VecDeque;

use super::records::{CellTypeIndex, SpawnPoint};

/// Default number of edits that can be undone.
pub const UNDO_CAPACITY: usize = 512;

/// Inverse of one edit.
#[derive(Clone, Debug, PartialEq)]
pub enum UndoEntry {
    /// A cell was placed or removed.
    Cell {
        /// Grid X.
        x: i32,
        /// Grid Y.
        y: i32,
        /// Palette index before the edit.
        previous: Option<CellTypeIndex>,
        /// Hand-placed flag before the edit.
        previous_hand_placed: bool,
        /// Drop tag before the edit.
        previous_drop: Option<String>,
    },
    /// A spawn was appended at `index`.
    SpawnInserted {
        /// Index of the new spawn.
        index: usize,
    },
    /// A spawn was removed from `index`.
    SpawnRemoved {
        /// Original list position.
        index: usize,
        /// The removed record.
        spawn: SpawnPoint,
    },
}

/// Fixed-capacity stack of [`UndoEntry`] values.
#[derive(Clone, Debug)]
pub struct UndoRing {
    entries: VecDeque<UndoEntry>,
    capacity: usize,
}

impl Default for UndoRing {
    fn default() -> Self {
        Self::with_capacity(UNDO_CAPACITY)
    }
}

impl UndoRing {
    /// Creates a ring holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Pushes an entry, evicting the oldest one when full.
    pub fn push(&mut self, entry: UndoEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Pops the most recent entry.
    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }

    /// Drops all history.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries held.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing can be undone.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
