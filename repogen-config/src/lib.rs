//! `repogen.toml` parsing and validation.
//!
//! All settings are optional; a missing file or section falls back to the
//! defaults exposed as constants here.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;

pub use config::{
    CONFIG_FILE_NAME, Config, DEFAULT_MARKER, DEFAULT_PRIMARY_TAG, DEFAULT_SUFFIX, DatabaseConfig,
    GeneratorConfig,
};
pub use error::{Error, Result, SourceContext};
