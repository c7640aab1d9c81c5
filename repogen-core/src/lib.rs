//! Core utilities and types for the repogen repository generator.
//!
//! This crate provides the naming helpers, database dialect type and
//! file-writing primitives shared by the other repogen crates.

mod file;
mod types;
mod utils;

// File operations
pub use file::{File, WriteResult};
// Fundamental types
pub use types::DatabaseType;
// String utilities
pub use utils::{is_identifier, pluralize, split_words, to_lower_camel_case, to_snake_case};
