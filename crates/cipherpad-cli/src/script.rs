#![forbid(unsafe_code)]

//! Scripted editing sessions.
//!
//! A script is one command per line; blank lines and lines starting with `#`
//! are skipped. After every command the session's `plain` and `cipher` are
//! printed, tab-separated.
//!
//! ```text
//! plain 你好          set plaintext
//! cipher AbcdEfgh     set cipher text
//! format camel        switch surface format
//! traditional on      toggle variant conversion (on/off)
//! undo
//! redo
//! clear
//! ```

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

use cipherpad_runtime::{CipherFormat, CipherService, CipherSession, MapCodeBook};
use serde::Deserialize;

use crate::error::{CliError, Result};

/// Code book file: `{"codes": {"你": "abcd"}, "traditional": {"汉": "漢"}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BookFile {
    codes: BTreeMap<String, String>,
    traditional: BTreeMap<String, String>,
}

/// Load a [`MapCodeBook`] from a JSON file.
///
/// # Errors
///
/// I/O and JSON errors, or [`CliError::InvalidBook`] when a key is not a
/// single character.
pub fn load_book(path: &Path) -> Result<MapCodeBook> {
    let content = std::fs::read_to_string(path)?;
    let file: BookFile = serde_json::from_str(&content)?;

    let single = |key: &str| {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CliError::InvalidBook {
                path: path.to_path_buf(),
                message: format!("{key:?} is not a single character"),
            }),
        }
    };

    let mut book = MapCodeBook::new();
    for (key, code) in &file.codes {
        book.insert(single(key)?, code.clone());
    }
    for (simplified, traditional) in &file.traditional {
        book = book.with_variant(single(simplified)?, single(traditional)?);
    }
    tracing::debug!(
        target: "cipherpad.cli",
        path = %path.display(),
        codes = book.len(),
        "loaded code book"
    );
    Ok(book)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'a> {
    Plain(&'a str),
    Cipher(&'a str),
    Format(CipherFormat),
    Traditional(bool),
    Undo,
    Redo,
    Clear,
}

fn parse_line(line: &str, number: usize) -> Result<Option<Command<'_>>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed.trim_end(), ""));
    let command = match word {
        "plain" => Command::Plain(rest),
        "cipher" => Command::Cipher(rest),
        "format" => Command::Format(
            rest.trim()
                .parse()
                .map_err(|err| CliError::script(number, format!("{err}")))?,
        ),
        "traditional" => match rest.trim() {
            "on" => Command::Traditional(true),
            "off" => Command::Traditional(false),
            other => {
                return Err(CliError::script(
                    number,
                    format!("expected `on` or `off`, got {other:?}"),
                ));
            }
        },
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "clear" => Command::Clear,
        other => return Err(CliError::script(number, format!("unknown command `{other}`"))),
    };
    Ok(Some(command))
}

/// Replay `script` against `session`, printing the state after each command.
///
/// # Errors
///
/// Stops at the first malformed line or rejected transformation.
pub fn run_script<S: CipherService>(
    session: &mut CipherSession<S>,
    script: impl BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    for (index, line) in script.lines().enumerate() {
        let line = line?;
        let number = index + 1;
        let Some(command) = parse_line(&line, number)? else {
            continue;
        };
        tracing::debug!(target: "cipherpad.cli", line = number, ?command, "script command");

        let applied = match command {
            Command::Plain(text) => session.set_plain(text),
            Command::Cipher(text) => session.set_cipher(text),
            Command::Format(format) => session.set_format(format),
            Command::Traditional(enabled) => session.set_traditional(enabled),
            Command::Undo => {
                session.undo();
                Ok(())
            }
            Command::Redo => {
                session.redo();
                Ok(())
            }
            Command::Clear => {
                session.clear();
                Ok(())
            }
        };
        applied.map_err(|source| CliError::Session {
            line: number,
            source,
        })?;
        writeln!(out, "{}\t{}", session.plain(), session.cipher())?;
    }
    Ok(())
}
