#![forbid(unsafe_code)]

//! Editing session: plaintext, cipher text, settings and history together.
//!
//! ```text
//! set_plain ──► encrypt ──► render ──► save(snapshot)
//! set_cipher ─► decrypt ──────────────► save(snapshot)
//! set_format ─► render(known parts) ──► save(snapshot)
//! undo/redo ──► history ──► write back ──► end_restore
//! ```
//!
//! A failed transformation leaves the session exactly as it was: text,
//! parts and history are only touched after the service succeeds.

use cipherpad_text::CipherFormat;

use crate::clipboard::{self, Clipboard};
use crate::history::{HistoryConfig, HistoryManager, HistoryState, SaveOutcome};
use crate::service::{CipherService, TransformError};
use crate::settings::Settings;

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Controller for one editing session.
#[derive(Debug)]
pub struct CipherSession<S> {
    service: S,
    settings: Settings,
    history: HistoryManager,
    plain: String,
    cipher: String,
    /// Canonical parts behind `cipher`, when known.
    parts: Option<Vec<String>>,
}

impl<S: CipherService> CipherSession<S> {
    /// Start a session with default history limits.
    pub fn new(service: S, settings: Settings) -> Self {
        Self::with_history_config(service, settings, HistoryConfig::default())
    }

    pub fn with_history_config(service: S, settings: Settings, config: HistoryConfig) -> Self {
        Self {
            service,
            settings,
            history: HistoryManager::new(config),
            plain: String::new(),
            cipher: String::new(),
            parts: Some(Vec::new()),
        }
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Replace the plaintext and re-encrypt.
    ///
    /// # Errors
    ///
    /// [`SessionError::Transform`] if the service rejects `text`; the session
    /// is left unchanged.
    pub fn set_plain(&mut self, text: &str) -> Result<(), SessionError> {
        let (plain, cipher, parts) =
            self.encrypt(text, self.settings.traditional_enabled, self.format())?;
        self.plain = plain;
        self.cipher = cipher;
        self.parts = Some(parts);
        self.record();
        Ok(())
    }

    /// Replace the cipher text and decrypt it.
    ///
    /// The cipher is kept exactly as typed; its canonical parts are unknown
    /// until the next encryption.
    ///
    /// # Errors
    ///
    /// [`SessionError::Transform`] if the service rejects `text`; the session
    /// is left unchanged.
    pub fn set_cipher(&mut self, text: &str) -> Result<(), SessionError> {
        let plain = if text.is_empty() {
            String::new()
        } else {
            self.service.decrypt(text)?
        };
        self.plain = plain;
        self.cipher = text.to_owned();
        self.parts = None;
        self.record();
        Ok(())
    }

    /// Switch the surface format.
    ///
    /// Known parts are re-rendered without calling the service. Otherwise the
    /// current plaintext is encrypted again.
    ///
    /// # Errors
    ///
    /// [`SessionError::Transform`] if re-encryption fails; the format is not
    /// changed in that case.
    pub fn set_format(&mut self, format: CipherFormat) -> Result<(), SessionError> {
        match &self.parts {
            Some(parts) => {
                self.cipher = self.service.reformat(parts, format);
            }
            None => {
                let plain = self.plain.clone();
                let (plain, cipher, parts) =
                    self.encrypt(&plain, self.settings.traditional_enabled, format)?;
                self.plain = plain;
                self.cipher = cipher;
                self.parts = Some(parts);
            }
        }
        self.settings.cipher_format = format;
        self.record();
        Ok(())
    }

    /// Turn the traditional-variant conversion on or off and re-encrypt.
    ///
    /// # Errors
    ///
    /// [`SessionError::Transform`] if re-encryption fails; the setting is not
    /// changed in that case.
    pub fn set_traditional(&mut self, enabled: bool) -> Result<(), SessionError> {
        let plain = self.plain.clone();
        let (plain, cipher, parts) = self.encrypt(&plain, enabled, self.format())?;
        self.settings.traditional_enabled = enabled;
        self.plain = plain;
        self.cipher = cipher;
        self.parts = Some(parts);
        self.record();
        Ok(())
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Restore the previous snapshot. Returns it, or `None` if there is none.
    pub fn undo(&mut self) -> Option<HistoryState> {
        let state = self.history.undo()?;
        self.write_back(&state);
        Some(state)
    }

    /// Restore the next snapshot. Returns it, or `None` if there is none.
    pub fn redo(&mut self) -> Option<HistoryState> {
        let state = self.history.redo()?;
        self.write_back(&state);
        Some(state)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Empty text, parts and history.
    pub fn clear(&mut self) {
        self.plain.clear();
        self.cipher.clear();
        self.parts = Some(Vec::new());
        self.history.clear();
    }

    // ========================================================================
    // Clipboard
    // ========================================================================

    /// Copy the cipher text. Returns whether anything was copied.
    pub fn copy_cipher<C: Clipboard + ?Sized>(&self, clipboard: &mut C) -> bool {
        clipboard::copy(clipboard, &self.cipher)
    }

    /// Copy the plaintext. Returns whether anything was copied.
    pub fn copy_plain<C: Clipboard + ?Sized>(&self, clipboard: &mut C) -> bool {
        clipboard::copy(clipboard, &self.plain)
    }

    /// Paste clipboard text as plaintext. `Ok(false)` if the clipboard was
    /// unreadable.
    ///
    /// # Errors
    ///
    /// As [`set_plain`](Self::set_plain).
    pub fn paste_plain<C: Clipboard + ?Sized>(
        &mut self,
        clipboard: &mut C,
    ) -> Result<bool, SessionError> {
        match clipboard::paste(clipboard) {
            Some(text) => self.set_plain(&text).map(|()| true),
            None => Ok(false),
        }
    }

    /// Paste clipboard text as cipher text. `Ok(false)` if the clipboard was
    /// unreadable.
    ///
    /// # Errors
    ///
    /// As [`set_cipher`](Self::set_cipher).
    pub fn paste_cipher<C: Clipboard + ?Sized>(
        &mut self,
        clipboard: &mut C,
    ) -> Result<bool, SessionError> {
        match clipboard::paste(clipboard) {
            Some(text) => self.set_cipher(&text).map(|()| true),
            None => Ok(false),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn plain(&self) -> &str {
        &self.plain
    }

    #[must_use]
    pub fn cipher(&self) -> &str {
        &self.cipher
    }

    /// Canonical parts behind the cipher text, if known.
    #[must_use]
    pub fn parts(&self) -> Option<&[String]> {
        self.parts.as_deref()
    }

    #[must_use]
    pub fn format(&self) -> CipherFormat {
        self.settings.cipher_format
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn encrypt(
        &self,
        text: &str,
        use_traditional: bool,
        format: CipherFormat,
    ) -> Result<(String, String, Vec<String>), SessionError> {
        if text.is_empty() {
            return Ok((String::new(), String::new(), Vec::new()));
        }
        let encrypted = self
            .service
            .encrypt(text, use_traditional, format)
            .inspect_err(|err| {
                tracing::debug!(target: "cipherpad.session", error = %err, "encrypt failed");
            })?;
        Ok((encrypted.normalized_plain, encrypted.cipher, encrypted.parts))
    }

    fn record(&mut self) {
        let state = HistoryState::new(self.plain.clone(), self.cipher.clone());
        let outcome = self.history.save(state);
        if outcome == SaveOutcome::Suppressed {
            tracing::warn!(
                target: "cipherpad.session",
                "edit dropped while a restoration was pending"
            );
        }
    }

    fn write_back(&mut self, state: &HistoryState) {
        self.plain.clone_from(&state.plain);
        self.cipher.clone_from(&state.cipher);
        self.parts = None;
        self.history.end_restore();
        tracing::debug!(
            target: "cipherpad.session",
            cursor = ?self.history.cursor(),
            "restored snapshot"
        );
    }
}
