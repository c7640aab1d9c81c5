use crate::{imports::ImportCollector, module::ModuleIdentity};

/// Declarations accumulated across generation tasks.
///
/// Tasks only append; a task's items stay contiguous and in task order.
#[derive(Debug, Clone)]
pub struct OutputTree {
    module: ModuleIdentity,
    imports: ImportCollector,
    items: Vec<syn::Item>,
    entities: Vec<String>,
}

impl OutputTree {
    pub fn new(module: ModuleIdentity) -> Self {
        Self {
            module,
            imports: ImportCollector::new(),
            items: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Append one task's block of declarations.
    pub fn merge(&mut self, entity: String, imports: &ImportCollector, items: Vec<syn::Item>) {
        self.imports.merge(imports);
        self.items.extend(items);
        self.entities.push(entity);
    }

    /// Module of the scanned file.
    pub fn module(&self) -> &ModuleIdentity {
        &self.module
    }

    pub fn imports(&self) -> &ImportCollector {
        &self.imports
    }

    pub fn items(&self) -> &[syn::Item] {
        &self.items
    }

    /// Entities generated so far, in task order.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }
}
