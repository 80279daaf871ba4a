//! Gemini client adapter
//!
//! Sends a single `generateContent` request built from [`ContentPart`]s and
//! returns the raw text of the first candidate. No retries; a failed call is
//! reported to the caller as a [`GenerationError`].

pub mod types;

pub use types::{ContentPart, GeminiGenerationConfig};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use types::{GeminiContent, GeminiGenerateRequest, GeminiGenerateResponse, GeminiPart};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Value shipped in `.env.example`; treated the same as an empty key
const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Falha na requisição ao modelo: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Modelo retornou status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Modelo não retornou conteúdo")]
    EmptyResponse,
}

/// Anything that can turn a list of content parts into model text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation request and return the raw reply text
    async fn generate(&self, parts: Vec<ContentPart>) -> Result<String, GenerationError>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
    pub generation: GeminiGenerationConfig,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            generation: GeminiGenerationConfig::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a config only when a real key is present
    pub fn from_key(api_key: Option<&str>) -> Option<Self> {
        api_key
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
            .map(Self::new)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model.trim()
        )
    }
}

/// reqwest-based Gemini client; cheap to share behind an `Arc`
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    fn build_request(&self, parts: &[ContentPart]) -> GeminiGenerateRequest {
        GeminiGenerateRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: parts.iter().map(GeminiPart::from).collect(),
            }],
            generation_config: self.config.generation.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, parts: Vec<ContentPart>) -> Result<String, GenerationError> {
        let request = self.build_request(&parts);

        log::debug!(
            "[gemini] Sending {} parts to model {}",
            parts.len(),
            self.config.model
        );

        let response = self
            .http
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    log::debug!("[gemini] Failed to read error body: {}", e);
                    format!("(corpo da resposta ilegível: {})", e)
                }
            };
            log::warn!("[gemini] Model returned {}: {}", status, body);
            return Err(GenerationError::Status { status, body });
        }

        let payload: GeminiGenerateResponse = response.json().await?;
        payload
            .first_candidate_text()
            .ok_or(GenerationError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
