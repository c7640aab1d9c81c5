use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use miette::SourceSpan;
use repogen_core::DatabaseType;
use serde::Deserialize;
use toml::Spanned;

use crate::{
    Result,
    error::{Error, SourceContext},
};

/// Name of the configuration file looked up next to the scanned source.
pub const CONFIG_FILE_NAME: &str = "repogen.toml";

/// Default doc-comment marker that opts a struct into generation.
pub const DEFAULT_MARKER: &str = "repogen:entity";

/// Default substring identifying the primary key field's attributes.
pub const DEFAULT_PRIMARY_TAG: &str = "primary";

/// Default suffix inserted before the `.rs` extension of the output file.
pub const DEFAULT_SUFFIX: &str = "_gen";

/// Validated generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub database: DatabaseConfig,
}

/// `[generator]` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Exact doc-comment line that marks a struct for generation.
    pub marker: String,
    /// Substring that must appear in a field's attributes to make it the key.
    pub primary_tag: String,
    /// Output file suffix (`user.rs` -> `user<suffix>.rs`).
    pub suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            primary_tag: DEFAULT_PRIMARY_TAG.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

/// `[database]` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQL backend the generated repositories talk to.
    pub backend: DatabaseType,
    /// Prepended verbatim to every derived table name.
    pub table_prefix: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    generator: RawGenerator,
    #[serde(default)]
    database: RawDatabase,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGenerator {
    marker: Option<Spanned<String>>,
    primary_tag: Option<Spanned<String>>,
    suffix: Option<Spanned<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDatabase {
    backend: Option<DatabaseType>,
    table_prefix: Option<Spanned<String>>,
}

fn span_of<T>(value: &Spanned<T>) -> SourceSpan {
    let range = value.span();
    SourceSpan::from((range.start, range.end - range.start))
}

fn is_name_fragment(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Config {
    /// Read and validate a configuration file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let config = Self::from_str_with_filename(&content, &filename)?;
        tracing::debug!(path = %path.display(), backend = %config.database.backend, "loaded configuration");
        Ok(config)
    }

    /// Locate `repogen.toml` in the directory containing `source`.
    pub fn discover(source: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = match source.as_ref().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let candidate = dir.join(CONFIG_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Parse configuration text, using `filename` in diagnostics.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let raw: RawConfig = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
        Self::from_raw(raw, &ctx)
    }

    fn from_raw(raw: RawConfig, ctx: &SourceContext) -> Result<Self> {
        let mut config = Config::default();

        if let Some(marker) = raw.generator.marker {
            if marker.get_ref().trim().is_empty() {
                return Err(ctx.invalid_value_error(
                    "generator.marker",
                    "the marker must not be empty",
                    Some(span_of(&marker)),
                ));
            }
            if marker.get_ref().contains('\n') {
                return Err(ctx.invalid_value_error(
                    "generator.marker",
                    "the marker is compared against a single doc line",
                    Some(span_of(&marker)),
                ));
            }
            config.generator.marker = marker.into_inner();
        }

        if let Some(tag) = raw.generator.primary_tag {
            if tag.get_ref().is_empty() {
                return Err(ctx.invalid_value_error(
                    "generator.primary_tag",
                    "an empty tag would match every field",
                    Some(span_of(&tag)),
                ));
            }
            config.generator.primary_tag = tag.into_inner();
        }

        if let Some(suffix) = raw.generator.suffix {
            if suffix.get_ref().is_empty() {
                return Err(ctx.invalid_value_error(
                    "generator.suffix",
                    "an empty suffix would overwrite the scanned file",
                    Some(span_of(&suffix)),
                ));
            }
            if !is_name_fragment(suffix.get_ref()) {
                return Err(ctx.invalid_value_error(
                    "generator.suffix",
                    "use only ASCII letters, digits and underscores",
                    Some(span_of(&suffix)),
                ));
            }
            config.generator.suffix = suffix.into_inner();
        }

        if let Some(backend) = raw.database.backend {
            config.database.backend = backend;
        }

        if let Some(prefix) = raw.database.table_prefix {
            if !is_name_fragment(prefix.get_ref()) {
                return Err(ctx.invalid_value_error(
                    "database.table_prefix",
                    "use only ASCII letters, digits and underscores",
                    Some(span_of(&prefix)),
                ));
            }
            config.database.table_prefix = prefix.into_inner();
        }

        Ok(config)
    }
}

impl FromStr for Config {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, CONFIG_FILE_NAME)
    }
}
