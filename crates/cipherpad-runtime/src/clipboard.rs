#![forbid(unsafe_code)]

//! Clipboard collaborator.
//!
//! The platform clipboard lives outside the runtime. Hosts implement
//! [`Clipboard`]; the runtime only calls [`copy`] and [`paste`], which turn
//! every failure into a plain `false`/`None` so a flaky clipboard never
//! aborts an edit.

/// Errors reported by a clipboard backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard holds no text")]
    NoText,
}

/// Text clipboard.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// [`ClipboardError`] if the platform refuses the write.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Current clipboard text.
    ///
    /// # Errors
    ///
    /// [`ClipboardError`] if nothing readable is on the clipboard.
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// Copy `text`. Empty text is not copied. Returns whether the copy happened.
pub fn copy<C: Clipboard + ?Sized>(clipboard: &mut C, text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    match clipboard.write_text(text) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(target: "cipherpad.clipboard", error = %err, "copy failed");
            false
        }
    }
}

/// Read clipboard text, `None` on any failure.
pub fn paste<C: Clipboard + ?Sized>(clipboard: &mut C) -> Option<String> {
    match clipboard.read_text() {
        Ok(text) => Some(text),
        Err(err) => {
            tracing::debug!(target: "cipherpad.clipboard", error = %err, "paste failed");
            None
        }
    }
}

/// In-process clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_owned());
        Ok(())
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.contents.clone().ok_or(ClipboardError::NoText)
    }
}
