//! Imports for the names a field type refers to.
//!
//! The key type is copied into the generated module as text, so every name
//! it starts from has to be importable there too. A leading name is looked
//! up in the scanned file's `use` items first, then among its top-level
//! declarations. Anything else (primitives, prelude types, absolute paths)
//! is left alone.

use syn::{
    ItemUse, TypePath, UseTree,
    visit::{self, Visit},
};

use crate::{imports::ImportCollector, module::ModuleIdentity, scan::SourceFile};

/// Add to `imports` whatever the generated module needs to name `ty`.
pub(crate) fn type_imports(ty: &syn::Type, source: &SourceFile, imports: &mut ImportCollector) {
    let mut names = LeadingNames::default();
    names.visit_type(ty);

    for name in names.0 {
        if let Some(found) = source.uses().iter().find_map(|item| from_use(item, &name)) {
            let path = rebase(&found.module, found.leading_colon, source);
            if path.is_empty() {
                let root = if found.leading_colon { "::" } else { "" };
                imports.add_module(&format!("{}{}", root, found.symbol));
            } else {
                imports.add(&path, &found.symbol);
            }
        } else if source.declares(&name) {
            imports.add(&source.module().import_path(), &name);
        } else {
            tracing::trace!(name = %name, "type name needs no import");
        }
    }
}

/// First segment of every relative path inside a type.
#[derive(Default)]
struct LeadingNames(Vec<String>);

impl<'ast> Visit<'ast> for LeadingNames {
    fn visit_type_path(&mut self, node: &'ast TypePath) {
        if node.qself.is_none()
            && node.path.leading_colon.is_none()
            && let Some(first) = node.path.segments.first()
        {
            let name = first.ident.to_string();
            if !matches!(name.as_str(), "crate" | "self" | "super" | "Self")
                && !self.0.contains(&name)
            {
                self.0.push(name);
            }
        }
        visit::visit_type_path(self, node);
    }
}

/// A `use` leaf that brings a name into scope.
struct UseMatch {
    leading_colon: bool,
    module: Vec<String>,
    symbol: String,
}

fn from_use(item: &ItemUse, name: &str) -> Option<UseMatch> {
    let (module, symbol) = find_leaf(&mut Vec::new(), &item.tree, name)?;
    Some(UseMatch {
        leading_colon: item.leading_colon.is_some(),
        module,
        symbol,
    })
}

fn find_leaf(prefix: &mut Vec<String>, tree: &UseTree, name: &str) -> Option<(Vec<String>, String)> {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            let found = find_leaf(prefix, &path.tree, name);
            prefix.pop();
            found
        }
        UseTree::Name(leaf) if leaf.ident == "self" => {
            let (last, module) = prefix.split_last()?;
            (last == name).then(|| (module.to_vec(), last.clone()))
        }
        UseTree::Name(leaf) => (leaf.ident == name).then(|| (prefix.clone(), name.to_string())),
        UseTree::Rename(rename) if rename.rename == name => {
            if rename.ident == "self" {
                let (last, module) = prefix.split_last()?;
                Some((module.to_vec(), format!("{} as {}", last, name)))
            } else {
                Some((prefix.clone(), format!("{} as {}", rename.ident, name)))
            }
        }
        UseTree::Rename(_) | UseTree::Glob(_) => None,
        UseTree::Group(group) => group
            .items
            .iter()
            .find_map(|item| find_leaf(prefix, item, name)),
    }
}

/// Rewrite a path written in the scanned module so it resolves from the
/// generated one.
fn rebase(module: &[String], leading_colon: bool, source: &SourceFile) -> String {
    let joined = module.join("::");
    let Some(first) = module.first() else {
        return joined;
    };

    if leading_colon {
        return format!("::{}", joined);
    }

    let here = source.module().import_path();
    match first.as_str() {
        "self" => std::iter::once(here)
            .chain(module[1..].iter().cloned())
            .collect::<Vec<_>>()
            .join("::"),
        // A child module's generated sibling shares its parent.
        "super" => match source.module() {
            ModuleIdentity::Root { .. } => format!("{}::{}", here, joined),
            ModuleIdentity::Child { .. } => joined,
        },
        "crate" => joined,
        local if source.declares(local) => format!("{}::{}", here, joined),
        _ => joined,
    }
}
