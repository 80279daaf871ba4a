//! Report assistant service
//!
//! Validates the incoming report, sends it to the model together with the
//! catalog-aware instruction prompt, and normalizes the reply into
//! [`AssistantData`]. Every outcome, success or failure, carries the elapsed
//! processing time.

pub mod error;
pub mod heuristics;
pub mod normalizer;

pub use error::AssistantError;

use crate::catalog::Catalog;
use crate::gemini::{ContentPart, TextGenerator};
use crate::models::{AssistantData, AssistantRequest, AssistantResponse};
use crate::templates::render_form_assistant_prompt;
use std::sync::Arc;
use std::time::Instant;

/// MIME type assumed for audio uploads that do not declare one
pub const DEFAULT_AUDIO_MIME_TYPE: &str = "audio/webm";

const DESCRIPTION_HEADER: &str = "\n\nDescrição fornecida:\n";
const AUDIO_ONLY_INSTRUCTION: &str =
    "\n\nPor favor, transcreva o áudio fornecido e processe as informações conforme o prompt acima.";
const AUDIO_WITH_TEXT_INSTRUCTION: &str =
    "\n\nConsidere também o áudio fornecido para complementar a descrição em texto.";
const JSON_ONLY_INSTRUCTION: &str = "\n\nRetorne APENAS o JSON válido:";

/// A failed run, with the time spent before failing
#[derive(Debug)]
pub struct ReportFailure {
    pub error: AssistantError,
    pub processed_in: String,
}

impl ReportFailure {
    pub fn status_code(&self) -> u16 {
        self.error.status_code()
    }

    /// Wire envelope for this failure
    pub fn to_response(&self) -> AssistantResponse {
        AssistantResponse::failure(self.error.to_string(), Some(self.processed_in.clone()))
    }
}

impl std::fmt::Display for ReportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (after {})", self.error, self.processed_in)
    }
}

impl std::error::Error for ReportFailure {}

fn elapsed(start: Instant) -> String {
    format!("{}ms", start.elapsed().as_millis())
}

/// Assemble the parts of a generation request, in the order the model expects
pub fn build_parts(prompt: &str, request: &AssistantRequest) -> Vec<ContentPart> {
    let mut parts = vec![ContentPart::text(prompt)];

    let description = request.trimmed_description();
    if let Some(description) = description {
        parts.push(ContentPart::text(format!(
            "{}{}",
            DESCRIPTION_HEADER, description
        )));
    }

    if let Some(audio) = request.audio.as_ref().filter(|a| !a.is_empty()) {
        let mime_type = request
            .audio_mime_type
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_AUDIO_MIME_TYPE);

        parts.push(ContentPart::InlineData {
            mime_type: mime_type.to_string(),
            data: audio.clone(),
        });

        parts.push(ContentPart::text(if description.is_some() {
            AUDIO_WITH_TEXT_INSTRUCTION
        } else {
            AUDIO_ONLY_INSTRUCTION
        }));
    }

    parts.push(ContentPart::text(JSON_ONLY_INSTRUCTION));
    parts
}

/// Turns free-form reports into ticket form data
pub struct AssistantService {
    generator: Arc<dyn TextGenerator>,
    catalog: Arc<Catalog>,
    prompt: String,
}

impl AssistantService {
    /// Create the service; the catalog is static, so the prompt is rendered once here
    pub fn new(generator: Arc<dyn TextGenerator>, catalog: Arc<Catalog>) -> anyhow::Result<Self> {
        let prompt = render_form_assistant_prompt(catalog.products(), catalog.users())?;
        log::debug!("[assistant] Prompt rendered ({} chars)", prompt.len());
        Ok(Self {
            generator,
            catalog,
            prompt,
        })
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Process one report end to end
    pub async fn process_report(
        &self,
        request: &AssistantRequest,
    ) -> Result<AssistantResponse, ReportFailure> {
        let start = Instant::now();

        match self.run(request).await {
            Ok(data) => {
                let processed_in = elapsed(start);
                log::info!(
                    "[assistant] Report processed in {} (category: {})",
                    processed_in,
                    data.category
                );
                Ok(AssistantResponse::ok(data, processed_in))
            }
            Err(error) => {
                let processed_in = elapsed(start);
                log::warn!("[assistant] Report failed after {}: {}", processed_in, error);
                Err(ReportFailure {
                    error,
                    processed_in,
                })
            }
        }
    }

    async fn run(&self, request: &AssistantRequest) -> Result<AssistantData, AssistantError> {
        if !request.has_description() && !request.has_audio() {
            return Err(AssistantError::missing_input());
        }

        let parts = build_parts(&self.prompt, request);
        let text = self.generator.generate(parts).await?;
        log::debug!("[assistant] Model reply: {}", text);

        normalizer::normalize_reply(&text, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GenerationError;
    use crate::models::{Category, Product};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Generator double that records calls and replays a canned reply
    struct ScriptedGenerator {
        reply: Result<String, u16>,
        calls: Mutex<Vec<Vec<ContentPart>>>,
    }

    impl ScriptedGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, parts: Vec<ContentPart>) -> Result<String, GenerationError> {
            self.calls.lock().unwrap().push(parts);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(GenerationError::Status {
                    status: *status,
                    body: "quota".to_string(),
                }),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(
            vec![Product {
                id: "1".to_string(),
                nome_projeto: "SOFTCOMSHOP".to_string(),
                setor: None,
            }],
            vec![],
        ))
    }

    fn good_reply() -> String {
        serde_json::json!({
            "title": "SOFTCOMSHOP > Vendas > Pedidos: erro ao salvar pedido com desconto",
            "description": "Comportamento atual:\n\nAo salvar um pedido com desconto o sistema exibe erro 500.\n\nComportamento esperado:\n\nO pedido deve ser salvo.\n\nPassos para reproduzir:\n  1. Acessar Vendas > Pedidos\n  2. Informar desconto\n  3. Clicar em Salvar",
            "category": "melhoria",
            "additionalInformation": "",
            "productId": "1",
            "userIds": []
        })
        .to_string()
    }

    #[test]
    fn test_build_parts_text_only() {
        let request = AssistantRequest::from_description("  tela trava  ");
        let parts = build_parts("PROMPT", &request);

        let texts: Vec<&str> = parts.iter().filter_map(ContentPart::as_text).collect();
        assert_eq!(
            texts,
            vec![
                "PROMPT",
                "\n\nDescrição fornecida:\ntela trava",
                "\n\nRetorne APENAS o JSON válido:"
            ]
        );
    }

    #[test]
    fn test_build_parts_audio_only_defaults_mime_type() {
        let request = AssistantRequest {
            audio: Some(vec![1, 2]),
            ..Default::default()
        };
        let parts = build_parts("PROMPT", &request);

        assert_eq!(parts.len(), 4);
        assert_eq!(
            parts[1],
            ContentPart::InlineData {
                mime_type: "audio/webm".to_string(),
                data: vec![1, 2],
            }
        );
        assert!(parts[2].as_text().unwrap().contains("transcreva"));
    }

    #[test]
    fn test_build_parts_text_and_audio() {
        let request = AssistantRequest {
            description: Some("tela trava".to_string()),
            audio: Some(vec![9]),
            audio_mime_type: Some("audio/ogg".to_string()),
        };
        let parts = build_parts("PROMPT", &request);

        assert_eq!(parts.len(), 5);
        assert!(matches!(&parts[2], ContentPart::InlineData { mime_type, .. } if mime_type == "audio/ogg"));
        assert!(parts[3].as_text().unwrap().contains("complementar"));
    }

    #[tokio::test]
    async fn test_missing_input_never_calls_model() {
        let generator = ScriptedGenerator::replying(&good_reply());
        let service = AssistantService::new(generator.clone(), catalog()).unwrap();

        let failure = service
            .process_report(&AssistantRequest::from_description("   "))
            .await
            .unwrap_err();

        assert!(matches!(failure.error, AssistantError::Validation(_)));
        assert_eq!(failure.status_code(), 400);
        assert!(failure.processed_in.ends_with("ms"));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_report() {
        let generator = ScriptedGenerator::replying(&good_reply());
        let service = AssistantService::new(generator.clone(), catalog()).unwrap();

        let response = service
            .process_report(&AssistantRequest::from_description("pedido com desconto dá erro"))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.confidence, Some(0.95));
        assert!(response.processed_in.unwrap().ends_with("ms"));
        let data = response.data.unwrap();
        assert_eq!(data.category, Category::Melhoria);
        assert_eq!(data.product.unwrap().id, "1");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_embeds_catalog() {
        let service =
            AssistantService::new(ScriptedGenerator::replying("{}"), catalog()).unwrap();
        assert!(service.prompt().contains("- ID: 1, Nome: SOFTCOMSHOP"));
        assert_eq!(service.model_name(), "scripted");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_internal_error() {
        let service = AssistantService::new(ScriptedGenerator::failing(429), catalog()).unwrap();

        let failure = service
            .process_report(&AssistantRequest::from_description("qualquer coisa"))
            .await
            .unwrap_err();

        assert!(matches!(failure.error, AssistantError::Upstream(_)));
        assert_eq!(failure.status_code(), 500);
        let response = failure.to_response();
        assert!(!response.success);
        assert!(response.error.unwrap().contains("429"));
    }

    #[tokio::test]
    async fn test_incomplete_reply_reported() {
        let service = AssistantService::new(
            ScriptedGenerator::replying(r#"{"title": "x", "category": "BUG", "productId": "1"}"#),
            catalog(),
        )
        .unwrap();

        let failure = service
            .process_report(&AssistantRequest::from_description("qualquer coisa"))
            .await
            .unwrap_err();

        assert_eq!(failure.error.to_string(), "Resposta da IA está incompleta");
        assert!(failure.to_response().data.is_none());
    }
}
