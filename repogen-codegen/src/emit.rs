//! Serialization of the output tree into the generated file.

use std::path::{Path, PathBuf};

use repogen_core::{File, WriteResult, is_identifier};
use syn::parse_quote;

use crate::{Result, error::Error, module::ModuleIdentity, output::OutputTree};

/// Destination of the generated file for `source`.
///
/// `user.rs` becomes `user<suffix>.rs`; any other file name gets
/// `<suffix>.rs` appended as a whole.
pub fn destination_path(source: &Path, suffix: &str) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let generated = match file_name.strip_suffix(".rs") {
        Some(stem) if !stem.is_empty() => format!("{}{}.rs", stem, suffix),
        _ => format!("{}{}.rs", file_name, suffix),
    };
    source.with_file_name(generated)
}

/// Format the output tree as Rust source.
///
/// The module header comes first, then the imports, then every merged
/// declaration in the order it was appended.
pub fn render(tree: &OutputTree) -> Result<String> {
    let header = format!(
        " Code generated by repogen from `{}`. DO NOT EDIT.",
        tree.module()
    );

    if let ModuleIdentity::Child { name } = tree.module()
        && !tree.entities().is_empty()
        && !is_identifier(name)
    {
        return Err(Box::new(Error::Serialization {
            message: format!(
                "module name `{}` is not a Rust identifier, entities cannot be imported from it",
                name
            ),
            source: None,
        }));
    }

    let mut items = tree.imports().to_items()?;
    items.extend(tree.items().iter().cloned());

    let file = syn::File {
        shebang: None,
        attrs: vec![parse_quote!(#![doc = #header])],
        items,
    };

    // Reject anything prettyplease could print but not read back.
    let content = prettyplease::unparse(&file);
    syn::parse_file(&content).map_err(|e| {
        Box::new(Error::Serialization {
            message: "formatted output is not valid Rust".to_string(),
            source: Some(e),
        })
    })?;

    Ok(content)
}

/// Render the tree and write it to `destination`.
///
/// Returns the rendered text together with whether the file changed.
pub fn emit(tree: &OutputTree, destination: &Path) -> Result<(String, WriteResult)> {
    let content = render(tree)?;
    let file = File::new(destination, content.as_str());
    let result = file.write().map_err(|e| {
        Box::new(Error::Write {
            path: destination.to_path_buf(),
            source: e,
        })
    })?;

    tracing::info!(path = %destination.display(), ?result, "emitted generated file");
    Ok((content, result))
}
