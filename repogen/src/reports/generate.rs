//! Generate command report data structures.

use std::path::PathBuf;

use repogen_core::{DatabaseType, WriteResult};

use super::output::{Output, Report};

/// Report data from one generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Scanned source file.
    pub source: PathBuf,

    /// Generated file path.
    pub destination: PathBuf,

    /// Backend the repositories target.
    pub backend: DatabaseType,

    /// Entities that received a repository, in source order.
    pub entities: Vec<String>,

    /// Write outcome or dry-run content.
    pub result: GenerationResult,
}

#[derive(Debug)]
pub enum GenerationResult {
    /// The file was written, or already up to date.
    Written(WriteResult),
    /// Dry-run preview of the file content.
    Preview(String),
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(write) => self.render_written(out, *write),
            GenerationResult::Preview(content) => self.render_preview(out, content),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, write: WriteResult) {
        let status = match write {
            WriteResult::Written => "Generated",
            WriteResult::Unchanged => "Unchanged",
        };
        out.key_value(status, &self.destination.display().to_string());
        self.render_entities(out);
    }

    fn render_entities(&self, out: &mut dyn Output) {
        if self.entities.is_empty() {
            out.key_value(
                "No marked structs in",
                &self.source.display().to_string(),
            );
            return;
        }

        out.newline();
        out.section(&format!("Repositories ({}, {})", self.entities.len(), self.backend));
        for entity in &self.entities {
            out.added_item(&format!("{}Repository", entity));
        }
    }

    fn render_preview(&self, out: &mut dyn Output, content: &str) {
        out.divider(&self.destination.display().to_string());
        out.preformatted(content);

        out.divider("Summary");
        let count = self.entities.len();
        out.preformatted(&format!(
            "{} {} would be generated",
            count,
            if count == 1 { "repository" } else { "repositories" }
        ));
    }
}
