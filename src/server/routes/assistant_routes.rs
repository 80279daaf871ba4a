//! Assistant route
//!
//! `POST /api/assistant` accepts either a JSON body `{ "description": ... }` or a
//! multipart form with a `description` text field and/or an `audio` file field.

use crate::assistant::{AssistantError, ReportFailure};
use crate::models::AssistantRequest;
use crate::server::ServerAppState;
use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::time::Instant;

use super::failure_response;

/// Largest accepted audio upload
pub const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

/// JSON body for text-only reports
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantJsonBody {
    #[serde(default)]
    pub description: Option<String>,
}

impl IntoResponse for ReportFailure {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}

/// Main assistant handler
pub async fn assistant_handler(
    State(state): State<ServerAppState>,
    request: Request,
) -> Response {
    let start = Instant::now();

    let Some(service) = state.assistant.clone() else {
        log::warn!("[assistant] Request rejected: GEMINI_API_KEY not configured");
        return failure_response(AssistantError::Unavailable, Some(elapsed_ms(start)));
    };

    let report = match read_report(request).await {
        Ok(report) => report,
        Err(error) => {
            log::warn!("[assistant] Invalid request body: {}", error);
            return failure_response(error, Some(elapsed_ms(start)));
        }
    };

    log::debug!(
        "[assistant] Report received (description: {}, audio: {} bytes)",
        report.has_description(),
        report.audio.as_ref().map_or(0, Vec::len)
    );

    // Run on its own task so a panic surfaces as a 500 instead of a dropped connection
    let task = tokio::spawn(async move { service.process_report(&report).await });

    match task.await {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(failure)) => failure.into_response(),
        Err(e) => {
            log::error!("[assistant] Report task failed: {}", e);
            failure_response(
                AssistantError::Internal("Erro interno ao processar o relato".to_string()),
                Some(elapsed_ms(start)),
            )
        }
    }
}

fn elapsed_ms(start: Instant) -> String {
    format!("{}ms", start.elapsed().as_millis())
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// Decode the request body into an [`AssistantRequest`]
async fn read_report(request: Request) -> Result<AssistantRequest, AssistantError> {
    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AssistantError::Validation(format!("Formulário inválido: {}", e)))?;
        read_multipart(multipart).await
    } else {
        let Json(body) = Json::<AssistantJsonBody>::from_request(request, &())
            .await
            .map_err(|e| {
                AssistantError::Validation(format!("Corpo da requisição inválido: {}", e))
            })?;
        Ok(AssistantRequest {
            description: body.description,
            ..Default::default()
        })
    }
}

fn audio_too_large() -> AssistantError {
    AssistantError::Validation("O arquivo de áudio excede o limite de 10MB".to_string())
}

/// Body-limit overruns report the same error as an oversized audio field
fn multipart_error(error: MultipartError) -> AssistantError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        audio_too_large()
    } else {
        AssistantError::Validation(format!("Formulário inválido: {}", error))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<AssistantRequest, AssistantError> {
    let mut report = AssistantRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "description" => {
                report.description = Some(field.text().await.map_err(multipart_error)?);
            }
            "audioMimeType" => {
                let mime_type = field.text().await.map_err(multipart_error)?;
                report.audio_mime_type = Some(mime_type);
            }
            "audio" => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > MAX_AUDIO_BYTES {
                    return Err(audio_too_large());
                }
                // An explicit audioMimeType field wins over the part's content type
                if report.audio_mime_type.is_none() {
                    report.audio_mime_type =
                        content_type.filter(|c| c != "application/octet-stream");
                }
                report.audio = Some(bytes.to_vec());
            }
            other => {
                log::debug!("[assistant] Ignoring multipart field '{}'", other);
            }
        }
    }

    Ok(report)
}
