#![forbid(unsafe_code)]

use std::path::PathBuf;

use cipherpad_runtime::{FormatError, SessionError, SettingsError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for bad input (unknown format, malformed script).
pub const USAGE_EXIT_CODE: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("line {line}: {source}")]
    Session {
        line: usize,
        #[source]
        source: SessionError,
    },

    #[error("invalid code book {path}: {message}")]
    InvalidBook { path: PathBuf, message: String },

    #[error("line {line}: {message}")]
    Script { line: usize, message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Format(_) | Self::Script { .. } => USAGE_EXIT_CODE,
            _ => 1,
        }
    }

    #[must_use]
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_is_a_usage_error() {
        let error = CliError::from("kebab".parse::<cipherpad_runtime::CipherFormat>().unwrap_err());
        assert_eq!(error.exit_code(), USAGE_EXIT_CODE);
        assert!(error.to_string().contains("kebab"));
    }

    #[test]
    fn script_error_carries_line_number() {
        let error = CliError::script(3, "unknown command `jump`");
        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.to_string(), "line 3: unknown command `jump`");
    }

    #[test]
    fn io_error_exits_with_one() {
        let error = CliError::from(std::io::Error::other("disk"));
        assert_eq!(error.exit_code(), 1);
    }
}
