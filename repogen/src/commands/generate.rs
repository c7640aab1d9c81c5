use std::path::{Path, PathBuf};

use clap::Args;
use eyre::Result;
use repogen_codegen::{Error, Pipeline};
use repogen_config::Config;

use super::UnwrapOrExit;
use crate::{
    ops::generate,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Source file to scan for marked structs
    #[arg(short, long, env = "REPOGEN_FILE")]
    pub file: Option<PathBuf>,

    /// Path to repogen.toml (defaults to the one next to the source file)
    #[arg(short, long, env = "REPOGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the generated file instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let source = self
            .file
            .as_deref()
            .ok_or_else(Error::missing_source)
            .unwrap_or_exit();

        let config = self.load_config(source).unwrap_or_exit();
        let pipeline = Pipeline::new(config).unwrap_or_exit();

        let report = generate(&pipeline, source, self.dry_run).unwrap_or_exit();
        report.render(&mut TerminalOutput::new());

        Ok(())
    }

    fn load_config(&self, source: &Path) -> repogen_config::Result<Config> {
        match self.config.clone().or_else(|| Config::discover(source)) {
            Some(path) => Config::open(path),
            None => {
                tracing::debug!("no repogen.toml found, using defaults");
                Ok(Config::default())
            }
        }
    }
}
