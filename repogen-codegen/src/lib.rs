//! Repository generation for marked Rust structs.
//!
//! A run scans one source file for structs whose doc comment carries the
//! marker line, renders a data-access repository for each of them and writes
//! the merged result next to the scanned file.
//!
//! # Module Organization
//!
//! - [`scan`] - Marked declaration discovery (Scanner, SourceFile, ...)
//! - [`generator`] - Per-entity template rendering and merging
//! - [`emit`] - Output formatting and atomic writing
//! - [`pipeline`] - The three phases wired together

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
pub mod emit;
pub mod generator;
mod imports;
mod module;
mod output;
mod params;
mod resolve;
pub mod pipeline;
pub mod scan;
mod sql;
mod task;
mod template;

pub use emit::{destination_path, emit, render};
pub use error::{Error, ErrorKind, Result, SourceContext};
pub use generator::{Generator, GeneratorOptions};
pub use imports::ImportCollector;
pub use module::ModuleIdentity;
pub use output::OutputTree;
pub use params::{TemplateParameters, primary_field, table_name};
pub use pipeline::{Outcome, Pipeline};
pub use scan::{Scanner, SourceDeclaration, SourceField, SourceFile};
pub use sql::{Column, Statement, Statements};
pub use task::GenerationTask;
pub use template::Templates;
