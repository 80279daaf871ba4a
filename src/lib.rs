// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::unnecessary_map_or)] // map_or can be clearer than alternatives

// Module declarations
pub mod assistant;
pub mod catalog;
pub mod gemini;
pub mod models;
pub mod shutdown;
pub mod templates;

// Server module (HTTP API)
pub mod server;

// Re-export models for use by the binary and integration tests
pub use models::*;

use std::sync::Arc;

/// Build the assistant service from an optional Gemini config.
///
/// Returns `Ok(None)` when no key is configured; the server still starts and
/// answers the assistant route with 503.
pub fn build_assistant(
    config: Option<gemini::GeminiConfig>,
    catalog: Arc<catalog::Catalog>,
) -> anyhow::Result<Option<assistant::AssistantService>> {
    let Some(config) = config else {
        log::warn!("GEMINI_API_KEY não configurada. O serviço de IA não funcionará corretamente.");
        log::warn!("Configure a variável GEMINI_API_KEY no arquivo .env");
        return Ok(None);
    };

    let model = config.model.clone();
    let client = gemini::GeminiClient::new(config)?;
    let service = assistant::AssistantService::new(Arc::new(client), catalog)?;
    log::info!("Gemini configurado com o modelo: {}", model);
    Ok(Some(service))
}
