#![forbid(unsafe_code)]

//! Editing runtime for cipherpad.
//!
//! # Role in cipherpad
//! `cipherpad-runtime` owns the state behind an editing surface: the current
//! plaintext and cipher text, undo/redo history, user settings and the
//! boundaries to the transformation service and the clipboard.
//!
//! # Primary responsibilities
//! - **CipherSession**: keeps plaintext and cipher text in sync.
//! - **History**: bounded snapshot log with a restoration guard.
//! - **Settings**: JSON persistence merged over defaults.
//! - **Service / Clipboard**: traits for the external collaborators, with a
//!   reference segmenting service and an in-memory clipboard.
//!
//! # Example
//! ```
//! use cipherpad_runtime::{CipherFormat, CipherSession, MapCodeBook, SegmentingService, Settings};
//!
//! let book = MapCodeBook::new().with('你', "abcd").with('好', "efgh");
//! let mut session = CipherSession::new(SegmentingService::new(book), Settings::default());
//!
//! session.set_plain("你好").unwrap();
//! assert_eq!(session.cipher(), "abcd efgh");
//!
//! session.set_format(CipherFormat::Pascal).unwrap();
//! assert_eq!(session.cipher(), "AbcdEfgh");
//!
//! session.undo();
//! assert_eq!(session.cipher(), "abcd efgh");
//! ```

pub mod clipboard;
pub mod history;
pub mod service;
pub mod session;
pub mod settings;

pub use cipherpad_text::{CipherFormat, FormatError, render};
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use history::{
    HistoryConfig, HistoryManager, HistoryMode, HistoryState, SaveOutcome, SharedHistory,
    SuppressionPolicy,
};
pub use service::{
    CipherService, CjkCodeBook, CodeBook, Encrypted, MapCodeBook, SegmentingService,
    TransformError,
};
pub use session::{CipherSession, SessionError};
pub use settings::{PageKind, Settings, SettingsError, Theme};
