use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already held identical content and was left untouched
    Unchanged,
}

/// A file to be generated
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    content: String,
}

impl File {
    /// Create a new file with the given path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Write the file atomically.
    ///
    /// The content is staged in a temporary file next to the destination and
    /// then renamed over it, so readers never observe a partially written file.
    /// Nothing is written when the destination already holds the same bytes.
    pub fn write(&self) -> io::Result<WriteResult> {
        if fs::read(&self.path).is_ok_and(|existing| existing == self.content.as_bytes()) {
            return Ok(WriteResult::Unchanged);
        }
        write_atomic(&self.path, &self.content)?;
        Ok(WriteResult::Written)
    }
}

fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(content.as_bytes())?;
    staged.flush()?;

    // Temporary files are private; keep whatever the destination had before.
    match fs::metadata(path) {
        Ok(meta) => staged.as_file().set_permissions(meta.permissions())?,
        Err(_) => set_default_permissions(staged.as_file())?,
    }

    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}
