//! Per-entity repository generation.

use repogen_config::Config;
use repogen_core::DatabaseType;
use syn::{Visibility, spanned::Spanned};

use crate::{
    Result,
    error::SourceContext,
    imports::ImportCollector,
    module::ModuleIdentity,
    output::OutputTree,
    params::{TemplateParameters, primary_field},
    resolve::type_imports,
    task::GenerationTask,
    template::Templates,
};

/// Settings that shape every generated repository.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub primary_tag: String,
    pub database: DatabaseType,
    pub table_prefix: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for GeneratorOptions {
    fn from(config: &Config) -> Self {
        Self {
            primary_tag: config.generator.primary_tag.clone(),
            database: config.database.backend,
            table_prefix: config.database.table_prefix.clone(),
        }
    }
}

/// Turns generation tasks into repository declarations.
#[derive(Debug)]
pub struct Generator<'t> {
    templates: &'t Templates,
    options: GeneratorOptions,
}

impl<'t> Generator<'t> {
    pub fn new(templates: &'t Templates, options: GeneratorOptions) -> Self {
        Self { templates, options }
    }

    /// Generate the repository for one task and append it to `output`.
    ///
    /// `output` is only touched once every step has succeeded.
    pub fn generate(&self, task: &GenerationTask<'_>, output: &mut OutputTree) -> Result<()> {
        let declaration = task.declaration();
        let entity = declaration.name();

        let primary = primary_field(declaration, &self.options.primary_tag).ok_or_else(|| {
            task.context()
                .no_primary_field_error(declaration.ident(), &self.options.primary_tag)
        })?;

        if let Some(param) = declaration.generics().params.first() {
            return Err(task.context().unsupported_entity_error(
                declaration.ident(),
                "generic structs are not supported; mark a concrete struct instead",
                param.span(),
            ));
        }

        // A sibling module only sees what its parent can; a module root's
        // generated child sees everything.
        if let ModuleIdentity::Child { .. } = task.module() {
            if is_private(declaration.vis()) {
                return Err(task.context().unsupported_entity_error(
                    declaration.ident(),
                    "the struct is private to its module; make it `pub` or `pub(crate)`",
                    declaration.ident().span(),
                ));
            }
            if let Some(field) = declaration.fields().iter().find(|f| is_private(f.vis())) {
                return Err(task.context().unsupported_entity_error(
                    declaration.ident(),
                    format!(
                        "field `{}` is private to its module; make it `pub` or `pub(crate)`",
                        field.name()
                    ),
                    field.ident().span(),
                ));
            }
        }

        let params = TemplateParameters::new(
            task,
            primary,
            self.options.database,
            &self.options.table_prefix,
        );
        let rendered = self.templates.render_repository(&params)?;

        let parsed = syn::parse_file(&rendered).map_err(|e| {
            SourceContext::new(rendered.as_str(), format!("{}Repository", entity))
                .template_parse_error(&entity, e)
        })?;

        let mut imports = ImportCollector::new();
        imports.add(&params.entity_path, &entity);
        type_imports(primary.ty(), task.source(), &mut imports);

        let mut items = Vec::with_capacity(parsed.items.len());
        for item in parsed.items {
            match item {
                syn::Item::Use(item) => imports.add_use_tree(&item.tree),
                other => items.push(other),
            }
        }

        tracing::debug!(
            entity = %entity,
            primary = %primary.name(),
            table = %params.table_name,
            items = items.len(),
            "generated repository"
        );

        output.merge(entity, &imports, items);
        Ok(())
    }
}

/// Inherited and `pub(self)` visibility stop at the declaring module.
fn is_private(vis: &Visibility) -> bool {
    match vis {
        Visibility::Inherited => true,
        Visibility::Restricted(restricted) => restricted.path.is_ident("self"),
        Visibility::Public(_) => false,
    }
}
