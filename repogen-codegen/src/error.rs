use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for generation (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Broad category of a failure, independent of the phase that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid run settings.
    Configuration,
    /// The scanned file or a rendered template is not valid Rust.
    Parse,
    /// A marked struct cannot be turned into a repository.
    Semantic,
    /// Template execution failed.
    Template,
    /// Reading the source or writing the destination failed.
    Io,
    /// The output tree could not be turned into a source file.
    Serialization,
}

/// Source context for error reporting.
///
/// Holds the text a span refers to so `proc_macro2` line/column positions
/// can be turned into the byte offsets miette labels need.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Convert a span of this source into a miette span.
    pub fn span(&self, span: proc_macro2::Span) -> Option<SourceSpan> {
        let start = span.start();
        let end = span.end();
        let from = self.offset(start.line, start.column)?;
        let to = self.offset(end.line, end.column)?;
        Some(SourceSpan::from((from, to.saturating_sub(from))))
    }

    /// Byte offset of a 1-based line and 0-based character column.
    fn offset(&self, line: usize, column: usize) -> Option<usize> {
        if line == 0 {
            return None;
        }
        let line_start = if line == 1 {
            0
        } else {
            self.src.match_indices('\n').nth(line - 2)?.0 + 1
        };
        let rest = self.src.get(line_start..)?;
        let column_bytes = rest
            .char_indices()
            .nth(column)
            .map_or(rest.len(), |(i, _)| i);
        Some(line_start + column_bytes)
    }

    /// Create a parse error for the scanned file.
    pub fn parse_error(&self, source: syn::Error) -> Box<Error> {
        Box::new(Error::Parse {
            src: self.named_source(),
            span: self.span(source.span()),
            filename: self.filename.clone(),
            message: source.to_string(),
            source,
        })
    }

    /// Create a missing primary field error labelled at the entity name.
    pub fn no_primary_field_error(
        &self,
        entity: &syn::Ident,
        tag: impl Into<String>,
    ) -> Box<Error> {
        Box::new(Error::NoPrimaryField {
            src: self.named_source(),
            span: self.span(entity.span()),
            entity: entity.to_string(),
            tag: tag.into(),
        })
    }

    /// Create an unsupported entity error labelled at `span`.
    pub fn unsupported_entity_error(
        &self,
        entity: &syn::Ident,
        reason: impl Into<String>,
        span: proc_macro2::Span,
    ) -> Box<Error> {
        Box::new(Error::UnsupportedEntity {
            src: self.named_source(),
            span: self.span(span),
            entity: entity.to_string(),
            reason: reason.into(),
        })
    }

    /// Create an error for rendered template text that failed to parse.
    pub fn template_parse_error(&self, entity: &str, source: syn::Error) -> Box<Error> {
        Box::new(Error::TemplateParse {
            src: self.named_source(),
            span: self.span(source.span()),
            entity: entity.to_string(),
            message: source.to_string(),
            source,
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("configuration: {message}")]
    #[diagnostic(code(repogen::configuration), help("{help}"))]
    Configuration { message: String, help: String },

    #[error("scan: failed to read '{path}'")]
    #[diagnostic(code(repogen::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scan: failed to parse {filename}")]
    #[diagnostic(code(repogen::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        filename: String,
        message: String,
        #[source]
        source: syn::Error,
    },

    #[error("generate: '{entity}' has no primary field")]
    #[diagnostic(
        code(repogen::no_primary_field),
        help("add an attribute containing \"{tag}\" to the key field, e.g. #[repogen(primary_key)]")
    )]
    NoPrimaryField {
        #[source_code]
        src: NamedSource<String>,
        #[label("no field of this struct carries \"{tag}\"")]
        span: Option<SourceSpan>,
        entity: String,
        tag: String,
    },

    #[error("generate: '{entity}' cannot have a repository")]
    #[diagnostic(code(repogen::unsupported_entity), help("{reason}"))]
    UnsupportedEntity {
        #[source_code]
        src: NamedSource<String>,
        #[label("{reason}")]
        span: Option<SourceSpan>,
        entity: String,
        reason: String,
    },

    #[error("generate: template '{template}' failed")]
    #[diagnostic(code(repogen::template_error))]
    Template {
        template: &'static str,
        #[source]
        source: minijinja::Error,
    },

    #[error("generate: rendered repository for '{entity}' is not valid Rust")]
    #[diagnostic(
        code(repogen::template_parse_error),
        help("the repository template produced malformed code; this is a bug in repogen")
    )]
    TemplateParse {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        entity: String,
        message: String,
        #[source]
        source: syn::Error,
    },

    #[error("emit: failed to write '{path}'")]
    #[diagnostic(code(repogen::io))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("emit: {message}")]
    #[diagnostic(code(repogen::serialization_error))]
    Serialization {
        message: String,
        #[source]
        source: Option<syn::Error>,
    },
}

impl Error {
    /// The source file to scan was not given.
    pub fn missing_source() -> Box<Self> {
        Box::new(Error::Configuration {
            message: "no source file to scan".to_string(),
            help: "set REPOGEN_FILE or pass --file <PATH>".to_string(),
        })
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Parse { .. } | Error::TemplateParse { .. } => ErrorKind::Parse,
            Error::NoPrimaryField { .. } | Error::UnsupportedEntity { .. } => ErrorKind::Semantic,
            Error::Template { .. } => ErrorKind::Template,
            Error::Read { .. } | Error::Write { .. } => ErrorKind::Io,
            Error::Serialization { .. } => ErrorKind::Serialization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_offsets() {
        let src = "struct A;\n/// doc\npub struct User {}\n";
        let file = syn::parse_file(src).unwrap();
        let syn::Item::Struct(user) = &file.items[1] else {
            panic!("expected a struct");
        };

        let ctx = SourceContext::new(src, "user.rs");
        let span = ctx.span(user.ident.span()).unwrap();

        assert_eq!(&src[span.offset()..span.offset() + span.len()], "User");
    }

    #[test]
    fn test_span_offsets_with_multibyte_text() {
        let src = "/// Пользователь\npub struct Юзер {}\n";
        let file = syn::parse_file(src).unwrap();
        let syn::Item::Struct(item) = &file.items[0] else {
            panic!("expected a struct");
        };

        let ctx = SourceContext::new(src, "user.rs");
        let span = ctx.span(item.ident.span()).unwrap();

        assert_eq!(&src[span.offset()..span.offset() + span.len()], "Юзер");
    }

    #[test]
    fn test_parse_error_is_labelled() {
        let src = "pub struct User {\n    id u32,\n}\n";
        let err = syn::parse_file(src).unwrap_err();
        let err = SourceContext::new(src, "user.rs").parse_error(err);

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.to_string(), "scan: failed to parse user.rs");
        let Error::Parse { span, .. } = *err else {
            panic!("expected a parse error");
        };
        let span = span.expect("parse errors point into the source");
        assert_eq!(&src[span.offset()..span.offset() + span.len()], "u32");
    }

    #[test]
    fn test_missing_source_is_configuration_error() {
        let err = Error::missing_source();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "configuration: no source file to scan");
    }
}
