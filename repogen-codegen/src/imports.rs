//! Import collection for generated files.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use syn::UseTree;

use crate::{Result, error::Error};

/// Tracks imports and deduplicates them.
///
/// Modules keep insertion order and symbols are sorted, so the rendered
/// `use` block is deterministic.
///
/// # Example
///
/// ```
/// use repogen_codegen::ImportCollector;
///
/// let mut imports = ImportCollector::new();
/// imports.add("sqlx", "PgPool");
/// imports.add("super::user", "User");
/// imports.add("sqlx", "PgPool");
///
/// let items = imports.to_items().unwrap();
/// assert_eq!(items.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    /// Module path -> set of symbols (sorted for deterministic output)
    imports: IndexMap<String, BTreeSet<String>>,
}

impl ImportCollector {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a symbol import from a module.
    pub fn add(&mut self, module: &str, symbol: &str) {
        self.imports
            .entry(module.to_string())
            .or_default()
            .insert(symbol.to_string());
    }

    /// Add a module import without specific symbols (`use serde;`).
    pub fn add_module(&mut self, module: &str) {
        self.imports.entry(module.to_string()).or_default();
    }

    /// Flatten a parsed `use` tree into module/symbol pairs.
    pub fn add_use_tree(&mut self, tree: &UseTree) {
        self.add_tree(String::new(), tree);
    }

    fn add_tree(&mut self, prefix: String, tree: &UseTree) {
        match tree {
            UseTree::Path(path) => {
                let prefix = join(&prefix, &path.ident.to_string());
                self.add_tree(prefix, &path.tree);
            }
            UseTree::Name(name) => self.add_leaf(&prefix, name.ident.to_string()),
            UseTree::Rename(rename) => {
                self.add_leaf(&prefix, format!("{} as {}", rename.ident, rename.rename))
            }
            UseTree::Glob(_) => self.add_leaf(&prefix, "*".to_string()),
            UseTree::Group(group) => {
                for item in &group.items {
                    self.add_tree(prefix.clone(), item);
                }
            }
        }
    }

    fn add_leaf(&mut self, prefix: &str, symbol: String) {
        if prefix.is_empty() {
            self.add_module(&symbol);
        } else {
            self.imports
                .entry(prefix.to_string())
                .or_default()
                .insert(symbol);
        }
    }

    /// Merge another collector into this one.
    pub fn merge(&mut self, other: &ImportCollector) {
        for (module, symbols) in &other.imports {
            let entry = self.imports.entry(module.clone()).or_default();
            entry.extend(symbols.iter().cloned());
        }
    }

    #[cfg(test)]
    pub(crate) fn has_symbol(&self, module: &str, symbol: &str) -> bool {
        self.imports
            .get(module)
            .is_some_and(|symbols| symbols.contains(symbol))
    }

    /// Iterate over all imports in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.imports.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of modules.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.imports.len()
    }

    /// Build one `use` item per module.
    ///
    /// Fails when a module path cannot be written as Rust, e.g. a source file
    /// whose name is not a valid module identifier.
    pub fn to_items(&self) -> Result<Vec<syn::Item>> {
        self.iter()
            .map(|(module, symbols)| {
                let symbols: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
                let text = match symbols.as_slice() {
                    [] => format!("use {};", module),
                    [symbol] => format!("use {}::{};", module, symbol),
                    _ => format!("use {}::{{{}}};", module, symbols.join(", ")),
                };
                syn::parse_str::<syn::Item>(&text).map_err(|e| {
                    Box::new(Error::Serialization {
                        message: format!("cannot form import `{}`", text),
                        source: Some(e),
                    })
                })
            })
            .collect()
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}::{}", prefix, segment)
    }
}
