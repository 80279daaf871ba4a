// Tera-backed template engine and render context

use crate::models::{Category, Product, User};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::sync::RwLock;
use tera::{Context, Tera};

use super::builtin;

/// Context handed to the form assistant template
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext<'a> {
    pub products: &'a [Product],
    pub users: &'a [User],
    pub categories: Vec<&'static str>,
}

impl<'a> PromptContext<'a> {
    pub fn new(products: &'a [Product], users: &'a [User]) -> Self {
        Self {
            products,
            users,
            categories: Category::all().iter().map(Category::as_str).collect(),
        }
    }
}

/// Thin wrapper over Tera so templates can be registered through a shared reference
pub struct TemplateEngine {
    tera: RwLock<Tera>,
}

impl TemplateEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        let mut tera = Tera::default();
        // Prompts are plain text; nothing should be HTML-escaped
        tera.autoescape_on(vec![]);
        Self {
            tera: RwLock::new(tera),
        }
    }

    /// Create an engine with every built-in template registered
    pub fn with_builtins() -> Result<Self> {
        let engine = Self::new();
        for (name, content) in builtin::get_builtin_templates() {
            engine.add_template(&name, &content)?;
        }
        Ok(engine)
    }

    /// Register (or replace) a template
    pub fn add_template(&self, name: &str, content: &str) -> Result<()> {
        let mut tera = self
            .tera
            .write()
            .map_err(|e| anyhow!("Template engine lock poisoned: {}", e))?;
        tera.add_raw_template(name, content)
            .map_err(|e| anyhow!("Failed to parse template '{}': {}", name, e))
    }

    /// Render a registered template with any serializable context
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        let context = Context::from_serialize(data)
            .map_err(|e| anyhow!("Failed to build context for '{}': {}", name, e))?;
        let tera = self
            .tera
            .read()
            .map_err(|e| anyhow!("Template engine lock poisoned: {}", e))?;
        tera.render(name, &context)
            .map_err(|e| anyhow!("Failed to render template '{}': {:?}", name, e))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
