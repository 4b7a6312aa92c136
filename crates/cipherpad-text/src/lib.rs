#![forbid(unsafe_code)]

//! Surface formats for cipher text.
//!
//! The transformation service hands back cipher text as an ordered list of
//! atomic *parts*. This crate turns such a list into one of five surface
//! encodings a user can view, and owns the closed [`CipherFormat`]
//! enumeration with its string names.
//!
//! ```
//! use cipherpad_text::{CipherFormat, render};
//!
//! let parts = ["ab", "cd", "ef"];
//! assert_eq!(render(&parts, CipherFormat::Space), "ab cd ef");
//! assert_eq!(render(&parts, CipherFormat::FourLetter), "abcd ef");
//! assert_eq!(render(&parts, CipherFormat::Pascal), "AbCdEf");
//! assert_eq!(render(&parts, CipherFormat::Camel), "abCdEf");
//! ```
//!
//! Rendering never parses. Recovering parts from free-form cipher text is
//! the transformation service's job.

pub mod format;
pub mod render;

pub use format::{CipherFormat, FormatError};
pub use render::{GROUP_WIDTH, render, render_all, render_named};
