#![forbid(unsafe_code)]

//! Thread-safe handle around a [`HistoryManager`].
//!
//! Log, cursor and suppression state sit behind one mutex, so every operation
//! is a single critical section. A `save` racing an `undo` on another thread
//! therefore sees either the state before the undo or the suppressed state
//! after it, never a half-updated cursor.

use std::sync::{Arc, Mutex, MutexGuard};

use super::HistoryState;
use super::manager::{HistoryConfig, HistoryManager, HistoryMode, SaveOutcome};

/// Cloneable, shareable history. Clones refer to the same log.
#[derive(Debug, Clone, Default)]
pub struct SharedHistory {
    inner: Arc<Mutex<HistoryManager>>,
}

impl SharedHistory {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HistoryManager::new(config))),
        }
    }

    pub fn save(&self, state: HistoryState) -> SaveOutcome {
        self.lock().save(state)
    }

    pub fn undo(&self) -> Option<HistoryState> {
        self.lock().undo()
    }

    pub fn redo(&self) -> Option<HistoryState> {
        self.lock().redo()
    }

    pub fn end_restore(&self) {
        self.lock().end_restore();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.lock().can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.lock().can_redo()
    }

    #[must_use]
    pub fn mode(&self) -> HistoryMode {
        self.lock().mode()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Run `f` with exclusive access, e.g. to undo and write back atomically.
    pub fn with<R>(&self, f: impl FnOnce(&mut HistoryManager) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, HistoryManager> {
        // Mutations finish before the guard drops; a poisoned log is intact.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
