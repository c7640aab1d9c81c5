//! Compiled template registry.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use crate::{Result, error::Error, params::TemplateParameters};

const REPOSITORY: &str = "repository.rs";
const REPOSITORY_SOURCE: &str = include_str!("../templates/repository.rs.jinja");

/// Templates compiled once and shared by every generation task.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_template(REPOSITORY, REPOSITORY_SOURCE)
            .map_err(|e| template_error(REPOSITORY, e))?;

        Ok(Self { env })
    }

    /// Render the repository skeleton for one entity.
    pub fn render_repository(&self, params: &TemplateParameters) -> Result<String> {
        self.render(REPOSITORY, params)
    }

    fn render(&self, name: &'static str, params: &TemplateParameters) -> Result<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| template_error(name, e))?;
        template.render(params).map_err(|e| template_error(name, e))
    }
}

fn template_error(template: &'static str, source: minijinja::Error) -> Box<Error> {
    Box::new(Error::Template { template, source })
}
