//! Scan, generate and emit in one run.

use std::path::{Path, PathBuf};

use repogen_config::Config;
use repogen_core::WriteResult;

use crate::{
    Result,
    emit::{destination_path, emit, render},
    generator::{Generator, GeneratorOptions},
    output::OutputTree,
    scan::Scanner,
    template::Templates,
};

/// Result of processing one source file.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Path of the generated file.
    pub destination: PathBuf,
    /// Entities that received a repository, in source order.
    pub entities: Vec<String>,
    /// Generated source text.
    pub content: String,
    /// `None` for previews.
    pub write: Option<WriteResult>,
}

/// The whole generation run for one configuration.
///
/// The first failing task aborts the run; nothing is written unless every
/// task succeeded.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
    templates: Templates,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            templates: Templates::new()?,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate repositories for `source` and write the sibling file.
    pub fn run(&self, source: impl AsRef<Path>) -> Result<Outcome> {
        let (destination, output) = self.build(source.as_ref())?;
        let (content, result) = emit(&output, &destination)?;
        Ok(Outcome {
            destination,
            entities: output.entities().to_vec(),
            content,
            write: Some(result),
        })
    }

    /// Generate repositories for `source` without touching the filesystem.
    pub fn preview(&self, source: impl AsRef<Path>) -> Result<Outcome> {
        let (destination, output) = self.build(source.as_ref())?;
        Ok(Outcome {
            destination,
            entities: output.entities().to_vec(),
            content: render(&output)?,
            write: None,
        })
    }

    fn build(&self, source: &Path) -> Result<(PathBuf, OutputTree)> {
        let file = Scanner::new(&self.config.generator.marker).scan(source)?;
        let generator = Generator::new(&self.templates, GeneratorOptions::from(&self.config));

        let mut output = OutputTree::new(file.module().clone());
        for task in file.tasks() {
            generator.generate(&task, &mut output)?;
        }

        Ok((destination_path(source, &self.config.generator.suffix), output))
    }
}
