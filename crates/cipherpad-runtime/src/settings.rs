#![forbid(unsafe_code)]

//! User settings persisted as JSON.
//!
//! Settings are a plain value owned by whoever needs them (usually the
//! [`CipherSession`](crate::session::CipherSession)); there is no global
//! instance. Loading is a pure function from a JSON string.
//!
//! # Format
//!
//! ```json
//! {
//!   "traditionalEnabled": true,
//!   "cipherFormat": "space",
//!   "theme": "dark",
//!   "currentPage": "single"
//! }
//! ```
//!
//! # Merging
//!
//! Stored JSON is merged over [`Settings::default`] key by key. Missing keys
//! keep their default, unknown keys are ignored, and a key whose value does
//! not deserialize (wrong type, unknown format name) falls back to its
//! default with a warning. Only input that is not a JSON object at all is an
//! error, and the `*_or_default` loaders turn even that into defaults.

use std::io;
use std::path::Path;

use cipherpad_text::CipherFormat;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const KEY_TRADITIONAL: &str = "traditionalEnabled";
const KEY_FORMAT: &str = "cipherFormat";
const KEY_THEME: &str = "theme";
const KEY_PAGE: &str = "currentPage";

const KNOWN_KEYS: [&str; 4] = [KEY_TRADITIONAL, KEY_FORMAT, KEY_THEME, KEY_PAGE];

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Which editing page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Single-character lookup.
    #[default]
    Single,
    /// Whole-sentence editing.
    Sentence,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Convert plaintext to the traditional variant before encrypting.
    pub traditional_enabled: bool,
    /// Surface format for rendered cipher text.
    pub cipher_format: CipherFormat,
    pub theme: Theme,
    #[serde(rename = "currentPage")]
    pub page: PageKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            traditional_enabled: true,
            cipher_format: CipherFormat::Space,
            theme: Theme::Dark,
            page: PageKind::Single,
        }
    }
}

impl Settings {
    /// Parse a JSON object and merge it over the defaults.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Json`] for malformed JSON and
    /// [`SettingsError::NotAnObject`] for valid JSON that is not an object.
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        match serde_json::from_str::<Value>(s)? {
            Value::Object(map) => Ok(Self::merged_over_defaults(&map)),
            _ => Err(SettingsError::NotAnObject),
        }
    }

    /// Read and parse a settings file.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Io`] when the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Like [`from_json_str`](Self::from_json_str), but never fails.
    #[must_use]
    pub fn load_or_default(s: &str) -> Self {
        Self::from_json_str(s).unwrap_or_else(|err| {
            tracing::warn!(
                target: "cipherpad.settings",
                error = %err,
                "discarding stored settings"
            );
            Self::default()
        })
    }

    /// Like [`from_json_file`](Self::from_json_file), but never fails.
    ///
    /// A missing file is the normal first-run case and is not logged as a
    /// warning.
    #[must_use]
    pub fn load_file_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_json_file(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    target: "cipherpad.settings",
                    path = %path.display(),
                    "no stored settings, using defaults"
                );
                Self::default()
            }
            Err(err) => {
                tracing::warn!(
                    target: "cipherpad.settings",
                    path = %path.display(),
                    error = %err,
                    "discarding stored settings"
                );
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Io`] or [`SettingsError::Json`].
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path.as_ref(), self.to_json_string()?)?;
        Ok(())
    }

    /// Flip between light and dark.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    fn merged_over_defaults(map: &Map<String, Value>) -> Self {
        let mut settings = Self::default();
        merge_key(map, KEY_TRADITIONAL, &mut settings.traditional_enabled);
        merge_key(map, KEY_FORMAT, &mut settings.cipher_format);
        merge_key(map, KEY_THEME, &mut settings.theme);
        merge_key(map, KEY_PAGE, &mut settings.page);

        for key in map.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            tracing::debug!(
                target: "cipherpad.settings",
                key = %key,
                "ignoring unknown settings key"
            );
        }
        settings
    }
}

fn merge_key<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(raw) = map.get(key) else {
        return;
    };
    match T::deserialize(raw) {
        Ok(value) => *slot = value,
        Err(err) => tracing::warn!(
            target: "cipherpad.settings",
            key,
            error = %err,
            "invalid settings value, keeping default"
        ),
    }
}

/// Errors from loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings must be a JSON object")]
    NotAnObject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(settings.traditional_enabled);
        assert_eq!(settings.cipher_format, CipherFormat::Space);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.page, PageKind::Single);
    }

    #[test]
    fn full_object_round_trips() {
        let settings = Settings {
            traditional_enabled: false,
            cipher_format: CipherFormat::Camel,
            theme: Theme::Light,
            page: PageKind::Sentence,
        };
        let json = settings.to_json_string().unwrap();
        assert!(json.contains("\"traditionalEnabled\": false"));
        assert!(json.contains("\"cipherFormat\": \"camel\""));
        assert!(json.contains("\"currentPage\": \"sentence\""));
        assert_eq!(Settings::from_json_str(&json).unwrap(), settings);
    }

    #[test]
    fn partial_object_merges_over_defaults() {
        let settings = Settings::from_json_str(r#"{"cipherFormat": "4-letter"}"#).unwrap();
        assert_eq!(settings.cipher_format, CipherFormat::FourLetter);
        assert!(settings.traditional_enabled);
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings =
            Settings::from_json_str(r#"{"fontSize": 14, "traditionalEnabled": false}"#).unwrap();
        assert!(!settings.traditional_enabled);
    }

    #[test]
    fn invalid_value_falls_back_per_key() {
        let settings = Settings::from_json_str(
            r#"{"cipherFormat": "kebab", "traditionalEnabled": "yes", "theme": "light"}"#,
        )
        .unwrap();
        assert_eq!(settings.cipher_format, CipherFormat::Space);
        assert!(settings.traditional_enabled);
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Settings::from_json_str("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn non_object_is_an_error() {
        assert!(matches!(
            Settings::from_json_str("[1, 2]"),
            Err(SettingsError::NotAnObject)
        ));
    }

    #[traced_test]
    #[test]
    fn load_or_default_logs_and_recovers() {
        let settings = Settings::load_or_default("{ not json");
        assert_eq!(settings, Settings::default());
        assert!(logs_contain("discarding stored settings"));
    }

    #[traced_test]
    #[test]
    fn invalid_value_is_logged() {
        let _ = Settings::load_or_default(r#"{"theme": 3}"#);
        assert!(logs_contain("invalid settings value"));
    }

    #[test]
    fn theme_toggles() {
        let mut settings = Settings::default();
        settings.toggle_theme();
        assert_eq!(settings.theme, Theme::Light);
        settings.toggle_theme();
        assert_eq!(settings.theme, Theme::Dark);
    }
}
