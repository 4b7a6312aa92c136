#![forbid(unsafe_code)]

//! Undo/redo history over (plaintext, cipher) snapshots.
//!
//! The history is a single linear log with a cursor, not a pair of stacks:
//! undo and redo only move the cursor, and recording a new snapshot while the
//! cursor sits in the middle discards everything after it.
//!
//! ```text
//! save(s3)
//! ┌──────────────────────────────────────┐
//! │ Entries: [s0, s1, s2, s3]            │
//! │ Cursor:               ^              │
//! └──────────────────────────────────────┘
//!
//! undo() x2
//! ┌──────────────────────────────────────┐
//! │ Entries: [s0, s1, s2, s3]            │
//! │ Cursor:       ^                      │
//! └──────────────────────────────────────┘
//!
//! save(s4), redo branch dropped
//! ┌──────────────────────────────────────┐
//! │ Entries: [s0, s1, s4]                │
//! │ Cursor:           ^                  │
//! └──────────────────────────────────────┘
//! ```
//!
//! # Suppression
//!
//! After an undo or redo the host writes the restored snapshot back into its
//! visible state. That write must not be recorded as a fresh edit, so the
//! [`HistoryManager`] enters a *suppressed* mode on every successful undo/redo
//! and ignores saves until the restoration is over. See [`SuppressionPolicy`]
//! for how the mode ends.
//!
//! # Module Structure
//!
//! - [`log`]: the bounded linear log and its cursor
//! - [`manager`]: suppression state machine on top of the log
//! - [`shared`]: mutex-guarded handle for multi-threaded hosts

pub mod log;
pub mod manager;
pub mod shared;

use serde::{Deserialize, Serialize};

pub use log::HistoryLog;
pub use manager::{
    DEFAULT_SUPPRESSION_WINDOW, HistoryConfig, HistoryManager, HistoryMode, MAX_HISTORY,
    SaveOutcome, SuppressionPolicy,
};
pub use shared::SharedHistory;

/// One recorded point in the editing session.
///
/// Two snapshots are equal iff both strings are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HistoryState {
    /// Plaintext as shown to the user.
    pub plain: String,
    /// Cipher text as rendered in the selected format.
    pub cipher: String,
}

impl HistoryState {
    /// Build a snapshot from the visible plaintext and cipher text.
    #[must_use]
    pub fn new(plain: impl Into<String>, cipher: impl Into<String>) -> Self {
        Self {
            plain: plain.into(),
            cipher: cipher.into(),
        }
    }
}
