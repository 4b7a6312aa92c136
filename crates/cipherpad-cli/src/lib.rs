#![forbid(unsafe_code)]

//! `cipherpad` command-line front-end.

pub mod cli;
pub mod error;
pub mod script;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{CliError, Result};
