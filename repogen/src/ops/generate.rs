//! Generate operation - repositories for one source file.

use std::path::Path;

use repogen_codegen::{Pipeline, Result};

use crate::reports::{GenerateReport, GenerationResult};

/// Execute the generate operation.
///
/// Writes the generated file, or only renders it when `dry_run` is set.
pub fn generate(pipeline: &Pipeline, source: &Path, dry_run: bool) -> Result<GenerateReport> {
    let outcome = if dry_run {
        pipeline.preview(source)?
    } else {
        pipeline.run(source)?
    };

    let result = match outcome.write {
        Some(write) => GenerationResult::Written(write),
        None => GenerationResult::Preview(outcome.content),
    };

    Ok(GenerateReport {
        source: source.to_path_buf(),
        destination: outcome.destination,
        backend: pipeline.config().database.backend,
        entities: outcome.entities,
        result,
    })
}
