#![forbid(unsafe_code)]

//! Rendering canonical parts into a surface format.
//!
//! All functions here are pure and total: every format is defined for every
//! part list, including the empty one (which renders to `""`). Parts are
//! never validated; characters outside the cipher alphabet pass through.
//!
//! # Case mapping
//!
//! Capitalization uses the Unicode case tables (`char::to_uppercase` and
//! `char::to_lowercase`), so a leading `ß` becomes `SS` and multi-byte
//! characters are never cut in half. Characters without case (CJK,
//! punctuation, whitespace) are left as they are.
//!
//! # Grouping
//!
//! `4-letter` counts user-perceived characters (extended grapheme clusters),
//! so a base letter and its combining marks always land in the same group.

use unicode_segmentation::UnicodeSegmentation;

use crate::format::{CipherFormat, FormatError};

/// Width of a group in the `4-letter` format.
pub const GROUP_WIDTH: usize = 4;

/// Render `parts` in `format`.
#[must_use]
pub fn render<S: AsRef<str>>(parts: &[S], format: CipherFormat) -> String {
    let out = match format {
        CipherFormat::Space => join_spaced(parts),
        CipherFormat::FourLetter => regroup(parts, GROUP_WIDTH),
        CipherFormat::FirstUpper | CipherFormat::Pascal => capitalize_each(parts),
        CipherFormat::Camel => lowercase_first(capitalize_each(parts)),
    };
    tracing::trace!(
        target: "cipherpad.format",
        parts = parts.len(),
        format = %format,
        len = out.len(),
        "rendered cipher parts"
    );
    out
}

/// Render `parts` using a format given by name.
///
/// # Errors
///
/// Returns [`FormatError::UnknownFormat`] when `name` is not one of the
/// canonical format names.
pub fn render_named<S: AsRef<str>>(parts: &[S], name: &str) -> Result<String, FormatError> {
    let format: CipherFormat = name.parse()?;
    Ok(render(parts, format))
}

/// Render `parts` in every format, in [`CipherFormat::ALL`] order.
#[must_use]
pub fn render_all<S: AsRef<str>>(parts: &[S]) -> Vec<(CipherFormat, String)> {
    CipherFormat::ALL
        .into_iter()
        .map(|format| (format, render(parts, format)))
        .collect()
}

fn total_len<S: AsRef<str>>(parts: &[S]) -> usize {
    parts.iter().map(|p| p.as_ref().len()).sum()
}

fn join_spaced<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::with_capacity(total_len(parts) + parts.len());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(part.as_ref());
    }
    out
}

fn regroup<S: AsRef<str>>(parts: &[S], width: usize) -> String {
    let joined: String = parts.iter().map(AsRef::as_ref).collect();
    let mut out = String::with_capacity(joined.len() + joined.len() / width.max(1));
    for (i, grapheme) in joined.graphemes(true).enumerate() {
        if i > 0 && i % width == 0 {
            out.push(' ');
        }
        out.push_str(grapheme);
    }
    out
}

fn capitalize_each<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::with_capacity(total_len(parts));
    for part in parts {
        push_capitalized(&mut out, part.as_ref());
    }
    out
}

fn push_capitalized(out: &mut String, part: &str) {
    let mut chars = part.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

fn lowercase_first(s: String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => s,
        Some(first) => {
            let mut out = String::with_capacity(s.len());
            out.extend(first.to_lowercase());
            out.push_str(chars.as_str());
            out
        }
    }
}
