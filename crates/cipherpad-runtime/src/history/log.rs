#![forbid(unsafe_code)]

//! Bounded linear snapshot log.
//!
//! # Invariants
//!
//! 1. `cursor` is `Some(i)` with `i < entries.len()`, or `None` iff the log
//!    is empty.
//! 2. `entries.len() <= max_depth` after any operation.
//! 3. Pushing truncates every entry after the cursor first.
//! 4. No two consecutive entries are equal.

use std::collections::VecDeque;
use std::fmt;

use super::HistoryState;

/// Ordered snapshots plus a cursor marking the current one.
#[derive(Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryState>,
    cursor: Option<usize>,
    max_depth: usize,
}

impl fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryLog")
            .field("len", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl HistoryLog {
    /// Create an empty log holding at most `max_depth` snapshots.
    ///
    /// A depth of zero is raised to one: the entry just pushed is always
    /// kept, so the cursor never points past an empty log.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            max_depth: max_depth.max(1),
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Append `state` after the cursor, dropping any redo branch.
    ///
    /// Returns `false` (and changes nothing) when `state` equals the entry at
    /// the cursor. When the log grows past `max_depth` the oldest entry is
    /// evicted and the cursor stays on the new tail.
    pub fn push(&mut self, state: HistoryState) -> bool {
        if self.current() == Some(&state) {
            return false;
        }
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push_back(state);
        self.enforce_depth();
        self.cursor = self.entries.len().checked_sub(1);
        true
    }

    /// Move the cursor one entry back and return the entry there.
    pub fn step_back(&mut self) -> Option<&HistoryState> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    /// Move the cursor one entry forward and return the entry there.
    pub fn step_forward(&mut self) -> Option<&HistoryState> {
        let cursor = self.cursor? + 1;
        if cursor >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor);
        self.entries.get(cursor)
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// Whether an entry exists before the cursor.
    #[must_use]
    pub fn can_step_back(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether an entry exists after the cursor.
    #[must_use]
    pub fn can_step_forward(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// The entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&HistoryState> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    /// Cursor position, `None` when empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entry at `index`, oldest first.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryState> {
        self.entries.get(index)
    }

    /// Iterate entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryState> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ====================================================================
    // Maintenance
    // ====================================================================

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    fn enforce_depth(&mut self) {
        while self.entries.len() > self.max_depth {
            self.entries.pop_front();
        }
    }
}
