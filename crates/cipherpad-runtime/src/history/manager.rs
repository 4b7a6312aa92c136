#![forbid(unsafe_code)]

//! History manager: the snapshot log plus the suppression state machine.
//!
//! # States
//!
//! ```text
//!            undo()/redo() succeeded
//!   ┌──────┐ ─────────────────────────► ┌────────────┐
//!   │ Idle │                            │ Suppressed │ ── save() ignored
//!   └──────┘ ◄───────────────────────── └────────────┘
//!            end_restore(), write-back save, or window elapsed
//! ```
//!
//! How `Suppressed` ends is chosen by [`SuppressionPolicy`]. The default
//! ([`SuppressionPolicy::WriteBack`]) is cleared synchronously by whoever
//! performs the restoration, so it neither swallows a fast follow-up edit nor
//! lets a slow write-back slip through. [`SuppressionPolicy::Window`] keeps
//! the older fixed-delay behavior for hosts that cannot tell a write-back
//! from an edit; its delay is a heuristic and can misfire in both directions.
//!
//! The window is a deadline checked on the next call, not a timer. Each
//! undo/redo replaces the deadline, so rapid navigation never stacks.

use std::fmt;

use web_time::{Duration, Instant};

use super::HistoryState;
use super::log::HistoryLog;

/// Default capacity of the history log.
pub const MAX_HISTORY: usize = 50;

/// Delay used by [`SuppressionPolicy::Window`] when none is given.
pub const DEFAULT_SUPPRESSION_WINDOW: Duration = Duration::from_millis(200);

/// How a suppression that started with undo/redo comes to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionPolicy {
    /// Suppressed until the restoration is finished: the next `save` is
    /// treated as the write-back and swallowed, or
    /// [`HistoryManager::end_restore`] is called.
    #[default]
    WriteBack,
    /// Suppressed for a fixed duration after the most recent undo/redo.
    Window(Duration),
}

/// Configuration for the history manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept. Oldest are evicted first.
    pub max_depth: usize,
    /// When suppression after undo/redo ends.
    pub suppression: SuppressionPolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_HISTORY,
            suppression: SuppressionPolicy::default(),
        }
    }
}

impl HistoryConfig {
    /// Create a configuration with a custom capacity (at least one).
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
            ..Self::default()
        }
    }

    /// Set the suppression policy.
    #[must_use]
    pub fn with_suppression(mut self, suppression: SuppressionPolicy) -> Self {
        self.suppression = suppression;
        self
    }

    /// Fixed 200ms suppression window.
    #[must_use]
    pub fn with_default_window(self) -> Self {
        self.with_suppression(SuppressionPolicy::Window(DEFAULT_SUPPRESSION_WINDOW))
    }
}

/// Observable mode of the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Saves are recorded.
    Idle,
    /// Saves are ignored because a restoration is in progress.
    Suppressed,
}

/// What [`HistoryManager::save`] did with a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "ignore with `let _ =` if the outcome does not matter"]
pub enum SaveOutcome {
    /// Appended as the new tail.
    Recorded,
    /// Equal to the current entry; nothing changed.
    Duplicate,
    /// Dropped because an undo/redo restoration was in progress.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Suppression {
    Idle,
    AwaitingWriteBack,
    Until(Instant),
}

/// Undo/redo manager over [`HistoryState`] snapshots.
///
/// Returned snapshots are owned clones; nothing handed out can reach into the
/// log.
#[derive(Clone)]
pub struct HistoryManager {
    log: HistoryLog,
    config: HistoryConfig,
    suppression: Suppression,
}

impl fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("log", &self.log)
            .field("suppression", &self.suppression)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryManager {
    /// Create a new history manager with the given configuration.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            log: HistoryLog::new(config.max_depth),
            config,
            suppression: Suppression::Idle,
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Offer a snapshot for recording.
    pub fn save(&mut self, state: HistoryState) -> SaveOutcome {
        self.save_at(state, Instant::now())
    }

    /// [`save`](Self::save) with an explicit clock reading.
    pub fn save_at(&mut self, state: HistoryState, now: Instant) -> SaveOutcome {
        if self.is_suppressed_at(now) {
            if self.suppression == Suppression::AwaitingWriteBack {
                self.suppression = Suppression::Idle;
            }
            tracing::debug!(
                target: "cipherpad.history",
                cursor = ?self.log.cursor(),
                "save ignored during restoration"
            );
            return SaveOutcome::Suppressed;
        }
        self.suppression = Suppression::Idle;

        if !self.log.push(state) {
            return SaveOutcome::Duplicate;
        }
        tracing::trace!(
            target: "cipherpad.history",
            len = self.log.len(),
            cursor = ?self.log.cursor(),
            "snapshot recorded"
        );
        SaveOutcome::Recorded
    }

    /// Step back one snapshot and return it.
    ///
    /// Returns `None` when nothing precedes the current snapshot. On success
    /// the manager becomes [`HistoryMode::Suppressed`].
    pub fn undo(&mut self) -> Option<HistoryState> {
        self.undo_at(Instant::now())
    }

    /// [`undo`](Self::undo) with an explicit clock reading.
    pub fn undo_at(&mut self, now: Instant) -> Option<HistoryState> {
        let state = self.log.step_back()?.clone();
        self.begin_restore(now, "undo");
        Some(state)
    }

    /// Step forward one snapshot and return it.
    ///
    /// Returns `None` when the cursor is already at the newest snapshot. On
    /// success the manager becomes [`HistoryMode::Suppressed`].
    pub fn redo(&mut self) -> Option<HistoryState> {
        self.redo_at(Instant::now())
    }

    /// [`redo`](Self::redo) with an explicit clock reading.
    pub fn redo_at(&mut self, now: Instant) -> Option<HistoryState> {
        let state = self.log.step_forward()?.clone();
        self.begin_restore(now, "redo");
        Some(state)
    }

    /// Mark the restoration write-back as finished.
    ///
    /// Called by the component that applied the snapshot returned from
    /// [`undo`](Self::undo) or [`redo`](Self::redo). Subsequent saves are
    /// recorded normally under either policy.
    pub fn end_restore(&mut self) {
        self.suppression = Suppression::Idle;
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.log.can_step_back()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.log.can_step_forward()
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> HistoryMode {
        self.mode_at(Instant::now())
    }

    /// [`mode`](Self::mode) with an explicit clock reading.
    #[must_use]
    pub fn mode_at(&self, now: Instant) -> HistoryMode {
        if self.is_suppressed_at(now) {
            HistoryMode::Suppressed
        } else {
            HistoryMode::Idle
        }
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.mode() == HistoryMode::Suppressed
    }

    /// The snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&HistoryState> {
        self.log.current()
    }

    /// Cursor position, `None` when the history is empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.log.cursor()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Read-only view of the underlying log.
    #[must_use]
    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Forget every snapshot and leave suppression (session restart).
    pub fn clear(&mut self) {
        self.log.clear();
        self.suppression = Suppression::Idle;
    }

    fn begin_restore(&mut self, now: Instant, op: &'static str) {
        self.suppression = match self.config.suppression {
            SuppressionPolicy::WriteBack => Suppression::AwaitingWriteBack,
            SuppressionPolicy::Window(window) => Suppression::Until(now + window),
        };
        tracing::debug!(
            target: "cipherpad.history",
            op,
            cursor = ?self.log.cursor(),
            len = self.log.len(),
            "history navigation"
        );
    }

    fn is_suppressed_at(&self, now: Instant) -> bool {
        match self.suppression {
            Suppression::Idle => false,
            Suppression::AwaitingWriteBack => true,
            Suppression::Until(deadline) => now < deadline,
        }
    }
}
