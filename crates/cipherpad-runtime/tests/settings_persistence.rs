#![forbid(unsafe_code)]

//! Settings file round trips on a real filesystem.

use cipherpad_runtime::settings::{PageKind, Settings, SettingsError, Theme};
use cipherpad_runtime::CipherFormat;

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut settings = Settings::default();
    settings.cipher_format = CipherFormat::FourLetter;
    settings.page = PageKind::Sentence;
    settings.toggle_theme();
    settings.save_file(&path).unwrap();

    let loaded = Settings::from_json_file(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.theme, Theme::Light);
}

#[test]
fn save_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "garbage that is much longer than the settings json ......").unwrap();

    Settings::default().save_file(&path).unwrap();
    assert_eq!(Settings::from_json_file(&path).unwrap(), Settings::default());
}

#[test]
fn missing_file_is_io_error_and_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    assert!(matches!(
        Settings::from_json_file(&path),
        Err(SettingsError::Io(_))
    ));
    assert_eq!(Settings::load_file_or_default(&path), Settings::default());
}

#[test]
fn malformed_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{\"cipherFormat\": ").unwrap();

    assert!(matches!(
        Settings::from_json_file(&path),
        Err(SettingsError::Json(_))
    ));
    assert_eq!(Settings::load_file_or_default(&path), Settings::default());
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"theme": "light", "cipherFormat": "camel"}"#).unwrap();

    let loaded = Settings::load_file_or_default(&path);
    assert_eq!(loaded.theme, Theme::Light);
    assert_eq!(loaded.cipher_format, CipherFormat::Camel);
    assert!(loaded.traditional_enabled);
    assert_eq!(loaded.page, PageKind::Single);
}
