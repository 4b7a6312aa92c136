#![forbid(unsafe_code)]

//! The closed set of cipher surface formats.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A surface encoding for rendered cipher text.
///
/// The set is closed. Names outside [`CipherFormat::ALL`] are rejected by
/// [`FromStr`] and by deserialization; nothing falls back to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CipherFormat {
    /// Parts joined by a single space.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "space"))]
    Space,
    /// Parts concatenated, then regrouped into runs of four characters.
    #[cfg_attr(feature = "serde", serde(rename = "4-letter"))]
    FourLetter,
    /// First character of every part uppercased, no separator.
    #[cfg_attr(feature = "serde", serde(rename = "first-upper"))]
    FirstUpper,
    /// Same output rule as `FirstUpper`, kept as a distinct user choice.
    #[cfg_attr(feature = "serde", serde(rename = "pascal"))]
    Pascal,
    /// `Pascal` with the very first character forced to lowercase.
    #[cfg_attr(feature = "serde", serde(rename = "camel"))]
    Camel,
}

impl CipherFormat {
    /// Every format, in presentation order.
    pub const ALL: [CipherFormat; 5] = [
        CipherFormat::Space,
        CipherFormat::FourLetter,
        CipherFormat::FirstUpper,
        CipherFormat::Pascal,
        CipherFormat::Camel,
    ];

    /// Canonical name, as used in settings files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CipherFormat::Space => "space",
            CipherFormat::FourLetter => "4-letter",
            CipherFormat::FirstUpper => "first-upper",
            CipherFormat::Pascal => "pascal",
            CipherFormat::Camel => "camel",
        }
    }
}

impl fmt::Display for CipherFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CipherFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| FormatError::UnknownFormat { name: s.to_owned() })
    }
}

/// Contract violations at the format boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// A format name outside the closed set was supplied.
    #[error(
        "unknown cipher format {name:?} (expected space, 4-letter, first-upper, pascal or camel)"
    )]
    UnknownFormat { name: String },
}
