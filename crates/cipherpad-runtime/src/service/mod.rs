#![forbid(unsafe_code)]

//! Boundary to the transformation service.
//!
//! The substitution itself is opaque to the runtime. A [`CipherService`]
//! turns plaintext into canonical parts (and a rendering of them), and turns
//! free-form cipher text in any surface format back into plaintext.
//!
//! [`segment`] holds a reference service that does the segmentation and
//! cipher pre-processing around a pluggable [`CodeBook`]; it ships no
//! substitution table of its own.

pub mod segment;

use cipherpad_text::{CipherFormat, render};

pub use segment::{
    CODE_LEN, CjkCodeBook, CodeBook, MapCodeBook, SegmentingService, is_cjk, is_code, split_cipher,
};

/// Result of encrypting plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    /// `parts` rendered in the requested format.
    pub cipher: String,
    /// Canonical parts, in order.
    pub parts: Vec<String>,
    /// The plaintext actually encrypted (after variant conversion).
    pub normalized_plain: String,
}

/// Failure reported by the transformation service. Details are opaque.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transformation failed: {message}")]
pub struct TransformError {
    message: String,
}

impl TransformError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Reversible text transformation.
pub trait CipherService {
    /// Encrypt `plain`, optionally converting it to the traditional variant
    /// first, and render the parts in `format`.
    ///
    /// # Errors
    ///
    /// [`TransformError`] when `plain` cannot be encoded.
    fn encrypt(
        &self,
        plain: &str,
        use_traditional: bool,
        format: CipherFormat,
    ) -> Result<Encrypted, TransformError>;

    /// Recover plaintext from cipher text in any surface format.
    ///
    /// # Errors
    ///
    /// [`TransformError`] when the input holds tokens the service rejects.
    fn decrypt(&self, cipher: &str) -> Result<String, TransformError>;

    /// Render already-known parts in another format.
    fn reformat(&self, parts: &[String], format: CipherFormat) -> String {
        render(parts, format)
    }
}

impl<T: CipherService + ?Sized> CipherService for &T {
    fn encrypt(
        &self,
        plain: &str,
        use_traditional: bool,
        format: CipherFormat,
    ) -> Result<Encrypted, TransformError> {
        (**self).encrypt(plain, use_traditional, format)
    }

    fn decrypt(&self, cipher: &str) -> Result<String, TransformError> {
        (**self).decrypt(cipher)
    }

    fn reformat(&self, parts: &[String], format: CipherFormat) -> String {
        (**self).reformat(parts, format)
    }
}

impl<T: CipherService + ?Sized> CipherService for Box<T> {
    fn encrypt(
        &self,
        plain: &str,
        use_traditional: bool,
        format: CipherFormat,
    ) -> Result<Encrypted, TransformError> {
        (**self).encrypt(plain, use_traditional, format)
    }

    fn decrypt(&self, cipher: &str) -> Result<String, TransformError> {
        (**self).decrypt(cipher)
    }

    fn reformat(&self, parts: &[String], format: CipherFormat) -> String {
        (**self).reformat(parts, format)
    }
}
