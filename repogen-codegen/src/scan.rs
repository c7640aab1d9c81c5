//! Discovery of marked struct declarations.
//!
//! A declaration qualifies when it is a top-level struct with named fields
//! whose outer doc comment contains a line equal to the marker. Everything
//! else is ignored without error.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use quote::ToTokens;
use syn::{Attribute, Expr, Fields, Item, ItemStruct, ItemUse, Lit, Meta, Visibility, ext::IdentExt};

use crate::{
    Result,
    error::{Error, SourceContext},
    module::ModuleIdentity,
    task::GenerationTask,
};

/// A field of a marked struct.
#[derive(Debug, Clone)]
pub struct SourceField {
    ident: syn::Ident,
    vis: Visibility,
    ty: syn::Type,
    tag: String,
}

impl SourceField {
    /// Field identifier as written (raw identifiers keep their `r#`).
    pub fn ident(&self) -> &syn::Ident {
        &self.ident
    }

    /// Field name without any `r#` prefix.
    pub fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    /// Declared visibility.
    pub fn vis(&self) -> &Visibility {
        &self.vis
    }

    /// Declared type.
    pub fn ty(&self) -> &syn::Type {
        &self.ty
    }

    /// Token text of the field's non-doc attributes, space separated.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// A marked struct declaration.
#[derive(Debug, Clone)]
pub struct SourceDeclaration {
    ident: syn::Ident,
    vis: Visibility,
    generics: syn::Generics,
    fields: Vec<SourceField>,
}

impl SourceDeclaration {
    fn from_struct(item: &ItemStruct, fields: &syn::FieldsNamed) -> Self {
        let fields = fields
            .named
            .iter()
            .filter_map(|field| {
                let ident = field.ident.clone()?;
                Some(SourceField {
                    ident,
                    vis: field.vis.clone(),
                    ty: field.ty.clone(),
                    tag: tag_text(&field.attrs),
                })
            })
            .collect();

        Self {
            ident: item.ident.clone(),
            vis: item.vis.clone(),
            generics: item.generics.clone(),
            fields,
        }
    }

    /// Type identifier.
    pub fn ident(&self) -> &syn::Ident {
        &self.ident
    }

    /// Type name, verbatim.
    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    /// Declared visibility of the struct.
    pub fn vis(&self) -> &Visibility {
        &self.vis
    }

    /// Generic parameters of the struct.
    pub fn generics(&self) -> &syn::Generics {
        &self.generics
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[SourceField] {
        &self.fields
    }
}

/// A scanned source file and the declarations marked in it.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    context: SourceContext,
    module: ModuleIdentity,
    uses: Vec<ItemUse>,
    locals: BTreeSet<String>,
    declarations: Vec<SourceDeclaration>,
}

impl SourceFile {
    /// Path the file was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source text, for diagnostics.
    pub fn context(&self) -> &SourceContext {
        &self.context
    }

    /// Module the file defines.
    pub fn module(&self) -> &ModuleIdentity {
        &self.module
    }

    /// Top-level `use` items in source order.
    pub fn uses(&self) -> &[ItemUse] {
        &self.uses
    }

    /// Whether `name` is an item declared at the top level of the file.
    pub fn declares(&self, name: &str) -> bool {
        self.locals.contains(name)
    }

    /// Marked declarations in source order.
    pub fn declarations(&self) -> &[SourceDeclaration] {
        &self.declarations
    }

    /// One generation task per marked declaration, in source order.
    pub fn tasks(&self) -> Vec<GenerationTask<'_>> {
        self.declarations
            .iter()
            .map(|declaration| GenerationTask::new(self, declaration))
            .collect()
    }
}

/// Finds marked declarations in a source file.
#[derive(Debug, Clone)]
pub struct Scanner {
    marker: String,
}

impl Scanner {
    /// Create a scanner looking for doc lines equal to `marker`.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Read and scan the file at `path`.
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<SourceFile> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Read {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        self.scan_str(src, path)
    }

    /// Scan source text as if it had been read from `path`.
    pub fn scan_str(&self, src: impl Into<String>, path: impl AsRef<Path>) -> Result<SourceFile> {
        let path = path.as_ref();
        let context = SourceContext::new(src, path.display().to_string());
        let file = syn::parse_file(context.src()).map_err(|e| context.parse_error(e))?;

        let declarations: Vec<_> = file
            .items
            .iter()
            .filter_map(|item| self.marked(item))
            .collect();

        let mut uses = Vec::new();
        let mut locals = BTreeSet::new();
        for item in &file.items {
            let ident = match item {
                Item::Use(item) => {
                    uses.push(item.clone());
                    continue;
                }
                Item::Struct(item) => &item.ident,
                Item::Enum(item) => &item.ident,
                Item::Union(item) => &item.ident,
                Item::Type(item) => &item.ident,
                Item::Trait(item) => &item.ident,
                Item::Mod(item) => &item.ident,
                _ => continue,
            };
            locals.insert(ident.unraw().to_string());
        }

        tracing::debug!(
            path = %path.display(),
            items = file.items.len(),
            marked = declarations.len(),
            "scanned source file"
        );

        Ok(SourceFile {
            path: path.to_path_buf(),
            module: ModuleIdentity::from_path(path),
            context,
            uses,
            locals,
            declarations,
        })
    }

    fn marked(&self, item: &Item) -> Option<SourceDeclaration> {
        let Item::Struct(item) = item else {
            return None;
        };

        let docs = doc_lines(&item.attrs);
        if docs.is_empty() {
            return None;
        }

        if !docs.iter().any(|line| *line == self.marker) {
            tracing::debug!(item = %item.ident, "skipping struct: doc comment has no marker line");
            return None;
        }

        let Fields::Named(fields) = &item.fields else {
            tracing::debug!(item = %item.ident, "skipping marked struct: fields are not named");
            return None;
        };

        tracing::debug!(entity = %item.ident, fields = fields.named.len(), "found marked struct");
        Some(SourceDeclaration::from_struct(item, fields))
    }
}

/// Lines of the outer doc comment, each without the single space `/// ` leaves.
fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| matches!(attr.style, syn::AttrStyle::Outer) && attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(lit) => match &lit.lit {
                    Lit::Str(s) => Some(s.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .flat_map(|doc| {
            doc.lines()
                .map(|line| line.strip_prefix(' ').unwrap_or(line).to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn tag_text(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("doc"))
        .map(|attr| attr.meta.to_token_stream().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
