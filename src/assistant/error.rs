// Error taxonomy for a single assistant run

use crate::gemini::GenerationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    /// Missing or empty input
    #[error("{0}")]
    Validation(String),

    /// No AI backend configured
    #[error("Serviço de IA não está disponível. Verifique a configuração da GEMINI_API_KEY.")]
    Unavailable,

    /// The model reply did not contain usable JSON
    #[error("Resposta da IA não contém JSON válido")]
    InvalidJson,

    /// title / description / category missing from the reply
    #[error("Resposta da IA está incompleta")]
    Incomplete,

    /// Heuristic rejection of an uninformative reply
    #[error("Conteúdo insuficiente para gerar o relatório: {0}")]
    InsufficientContent(String),

    #[error(transparent)]
    Upstream(#[from] GenerationError),

    #[error("{0}")]
    Internal(String),
}

impl AssistantError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            AssistantError::Validation(_)
            | AssistantError::InvalidJson
            | AssistantError::Incomplete
            | AssistantError::InsufficientContent(_) => 400,
            AssistantError::Unavailable => 503,
            AssistantError::Upstream(_) | AssistantError::Internal(_) => 500,
        }
    }

    pub fn missing_input() -> Self {
        AssistantError::Validation(
            "É necessário fornecer pelo menos uma descrição (texto) ou um arquivo de áudio"
                .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AssistantError::missing_input().status_code(), 400);
        assert_eq!(AssistantError::InvalidJson.status_code(), 400);
        assert_eq!(AssistantError::Incomplete.status_code(), 400);
        assert_eq!(
            AssistantError::InsufficientContent("x".to_string()).status_code(),
            400
        );
        assert_eq!(AssistantError::Unavailable.status_code(), 503);
        assert_eq!(
            AssistantError::Upstream(GenerationError::EmptyResponse).status_code(),
            500
        );
        assert_eq!(AssistantError::Internal("x".to_string()).status_code(), 500);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AssistantError::Incomplete.to_string(),
            "Resposta da IA está incompleta"
        );
        assert!(AssistantError::InsufficientContent("descrição curta".to_string())
            .to_string()
            .ends_with("descrição curta"));
    }
}
