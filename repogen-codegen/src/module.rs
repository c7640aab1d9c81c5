//! Identity of the module a scanned file defines.

use std::{fmt, path::Path};

/// The module defined by the scanned file.
///
/// The generated file is declared next to the scanned one, so it reaches the
/// entities through `super`: a named child module (`user.rs`) is addressed as
/// `super::user`, while a module root (`lib.rs`, `main.rs`, `mod.rs`) owns the
/// generated module directly and is plain `super`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleIdentity {
    /// `lib.rs`, `main.rs` or `mod.rs`; the name is the crate or directory.
    Root { name: String },
    /// Any other file, named after its stem.
    Child { name: String },
}

impl ModuleIdentity {
    /// Derive the module identity from the scanned file's path.
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match stem.as_str() {
            "lib" | "main" => ModuleIdentity::Root {
                name: "crate".to_string(),
            },
            "mod" => ModuleIdentity::Root {
                name: path
                    .parent()
                    .and_then(Path::file_name)
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "crate".to_string()),
            },
            _ => ModuleIdentity::Child { name: stem },
        }
    }

    /// Module name as written in the header.
    pub fn name(&self) -> &str {
        match self {
            ModuleIdentity::Root { name } | ModuleIdentity::Child { name } => name,
        }
    }

    /// Path the generated module uses to import items of the scanned module.
    pub fn import_path(&self) -> String {
        match self {
            ModuleIdentity::Root { .. } => "super".to_string(),
            ModuleIdentity::Child { name } => format!("super::{}", name),
        }
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
