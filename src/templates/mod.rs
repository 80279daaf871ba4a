// Template system for prompt generation

pub mod builtin;
pub mod engine;

// Re-export main types
pub use engine::{PromptContext, TemplateEngine};

use crate::models::{Product, User};
use anyhow::Result;

/// Render the form assistant instruction prompt with the catalog embedded
pub fn render_form_assistant_prompt(products: &[Product], users: &[User]) -> Result<String> {
    let engine = TemplateEngine::with_builtins()?;
    let context = PromptContext::new(products, users);
    engine.render(builtin::FORM_ASSISTANT, &context)
}
