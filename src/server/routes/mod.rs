//! HTTP route handlers
//!
//! - assistant_routes: `POST /api/assistant`
//! - this module: `GET /health`, `GET /`, and the shared error envelope

pub mod assistant_routes;

use crate::assistant::AssistantError;
use crate::models::AssistantResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
}

/// Body of `GET /`
#[derive(Debug, Serialize)]
pub struct WelcomeMessage {
    pub message: &'static str,
    pub status: &'static str,
}

/// Render an error with the common `{ success: false, error, processedIn? }` envelope
pub fn failure_response(error: AssistantError, processed_in: Option<String>) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(AssistantResponse::failure(error.to_string(), processed_in)),
    )
        .into_response()
}

/// Health check endpoint
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Index handler - welcome message
pub async fn index_handler() -> Json<WelcomeMessage> {
    Json(WelcomeMessage {
        message: "Bem-vindo ao Assistente de IA",
        status: "online",
    })
}

/// Fallback for unknown paths, using the same envelope as every other error
pub async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(AssistantResponse::failure("Rota não encontrada", None)),
    )
        .into_response()
}
