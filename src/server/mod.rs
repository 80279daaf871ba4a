//! HTTP server for the report assistant
//!
//! Exposes `POST /api/assistant`, `GET /health` and `GET /`. Request handling
//! is stateless apart from the read-only catalog and assistant service.

pub mod routes;
pub mod state;

pub use state::ServerAppState;

use anyhow::{anyhow, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Router,
};
use routes::assistant_routes::{self, MAX_AUDIO_BYTES};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Headroom over the audio limit for the description field and multipart framing
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

fn cors_layer(cors_origins: Option<&[String]>) -> CorsLayer {
    match cors_origins {
        Some(origins) if !origins.is_empty() => {
            // Restricted CORS: only allow specified origins
            let allowed_origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods(Any)
                .allow_headers([CONTENT_TYPE, ACCEPT])
        }
        // Permissive CORS: allow any origin (default for development)
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([CONTENT_TYPE, ACCEPT]),
    }
}

/// Build the application router
pub fn build_router(state: ServerAppState, cors_origins: Option<&[String]>) -> Router {
    Router::new()
        .route(
            "/api/assistant",
            post(assistant_routes::assistant_handler)
                .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES + BODY_LIMIT_SLACK)),
        )
        .route("/health", get(routes::health_handler))
        .route("/", get(routes::index_handler))
        .fallback(routes::not_found_handler)
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Run the HTTP server until a shutdown is requested
pub async fn run_server(
    port: u16,
    bind: &str,
    state: ServerAppState,
    cors_origins: Option<Vec<String>>,
) -> Result<()> {
    let app = build_router(state.clone(), cors_origins.as_deref());

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| anyhow!("Invalid address: {}", e))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", addr, e))?;

    let cors_display = match &cors_origins {
        Some(origins) if !origins.is_empty() => origins.join(", "),
        _ => "*".to_string(),
    };
    let ai_status = match &state.assistant {
        Some(service) => format!("Gemini ({})", service.model_name()),
        None => "not configured".to_string(),
    };

    log::info!("Server listening on http://{}", addr);
    log::info!("CORS origins: {}", cors_display);
    log::info!("AI backend: {}", ai_status);
    log::info!(
        "Catalog: {} products, {} users",
        state.catalog.products().len(),
        state.catalog.users().len()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(state.shutdown_state.clone().wait())
        .await
        .map_err(|e| anyhow!("Server error: {}", e))
}
