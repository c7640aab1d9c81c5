use crate::{
    error::SourceContext,
    module::ModuleIdentity,
    scan::{SourceDeclaration, SourceFile},
};

/// One marked declaration queued for generation.
///
/// Borrows the scanned file; nothing is copied out of it.
#[derive(Debug, Clone, Copy)]
pub struct GenerationTask<'a> {
    source: &'a SourceFile,
    declaration: &'a SourceDeclaration,
}

impl<'a> GenerationTask<'a> {
    pub(crate) fn new(source: &'a SourceFile, declaration: &'a SourceDeclaration) -> Self {
        Self {
            source,
            declaration,
        }
    }

    /// The scanned file the declaration came from.
    pub fn source(&self) -> &'a SourceFile {
        self.source
    }

    pub fn declaration(&self) -> &'a SourceDeclaration {
        self.declaration
    }

    pub fn module(&self) -> &'a ModuleIdentity {
        self.source.module()
    }

    pub fn context(&self) -> &'a SourceContext {
        self.source.context()
    }
}
