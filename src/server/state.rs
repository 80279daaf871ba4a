//! Server application state shared across handlers

use crate::assistant::AssistantService;
use crate::catalog::Catalog;
use crate::shutdown::ShutdownState;
use std::sync::Arc;

/// Read-only state shared by every request
#[derive(Clone)]
pub struct ServerAppState {
    /// Product/user catalog loaded at startup
    pub catalog: Arc<Catalog>,

    /// Assistant service; `None` when no Gemini key is configured
    pub assistant: Option<Arc<AssistantService>>,

    /// Shutdown state
    pub shutdown_state: ShutdownState,
}

impl ServerAppState {
    pub fn new(
        catalog: Arc<Catalog>,
        assistant: Option<AssistantService>,
        shutdown_state: ShutdownState,
    ) -> Self {
        Self {
            catalog,
            assistant: assistant.map(Arc::new),
            shutdown_state,
        }
    }
}
