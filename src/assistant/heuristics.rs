// Plausibility checks for model replies
//
// Best-effort detectors for replies that are syntactically complete but carry
// no real information (placeholder-heavy, boilerplate titles, too short).
// The phrase lists are approximate and may reject terse legitimate reports.

use crate::models::AssistantDataFromAi;
use regex::Regex;
use std::sync::OnceLock;

/// Placeholder the prompt tells the model to use for missing blocks
const PLACEHOLDER: &str = "não informado";

/// Maximum placeholder occurrences across title, description and additional info
const MAX_PLACEHOLDERS: usize = 2;

/// Minimum description length, in characters
pub const MIN_DESCRIPTION_CHARS: usize = 100;

/// Maximum vague fragments tolerated in a description
const MAX_VAGUE_PHRASES: usize = 3;

/// Stock phrases that, paired with a boilerplate title, mark a fabricated report
const STOCK_PHRASES: &[&str] = &[
    "corrigir o problema",
    "ajustar o comportamento",
    "melhorar a funcionalidade",
    "verificar o problema",
    "comportamento inesperado",
    "funcionar corretamente",
];

/// Fragments typical of vague, content-free descriptions
const VAGUE_PHRASES: &[&str] = &[
    "não funciona",
    "não está funcionando",
    "está com problema",
    "apresenta problema",
    "algo errado",
    "comportamento inesperado",
    "funcionar corretamente",
    "funcionar normalmente",
    "de forma adequada",
    "conforme necessário",
    "conforme esperado",
    "precisa ser ajustado",
    "precisa ser corrigido",
    "precisa ser melhorado",
    "melhorar a experiência",
    "verificar o problema",
];

static GENERIC_TITLE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn get_generic_title_pattern() -> &'static Regex {
    GENERIC_TITLE_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*produto\s*>\s*tela\s+\S+\s*:\s*(ajustar|melhorar|corrigir)\b")
            .unwrap()
    })
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Return the reason the reply is rejected, or `None` if it looks informative
pub fn check_plausibility(data: &AssistantDataFromAi) -> Option<String> {
    let title = data.title.to_lowercase();
    let description = data.description.to_lowercase();
    let additional = data
        .additional_information
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    let placeholders = count_occurrences(&title, PLACEHOLDER)
        + count_occurrences(&description, PLACEHOLDER)
        + count_occurrences(&additional, PLACEHOLDER);
    if placeholders > MAX_PLACEHOLDERS {
        return Some(format!(
            "\"Não informado\" aparece {} vezes na resposta",
            placeholders
        ));
    }

    // Each placeholder is two words
    let description_words = description.split_whitespace().count();
    let placeholder_words = count_occurrences(&description, PLACEHOLDER) * 2;
    if description_words > 0 && placeholder_words * 2 > description_words {
        return Some("a descrição é composta majoritariamente por \"Não informado\"".to_string());
    }

    if get_generic_title_pattern().is_match(&data.title)
        && STOCK_PHRASES.iter().any(|phrase| description.contains(phrase))
    {
        return Some("título e descrição seguem um padrão genérico".to_string());
    }

    let length = data.description.trim().chars().count();
    if length < MIN_DESCRIPTION_CHARS {
        return Some(format!(
            "a descrição tem {} caracteres (mínimo {})",
            length, MIN_DESCRIPTION_CHARS
        ));
    }

    let vague = VAGUE_PHRASES
        .iter()
        .filter(|phrase| description.contains(*phrase))
        .count();
    if vague > MAX_VAGUE_PHRASES {
        return Some(format!("a descrição contém {} expressões vagas", vague));
    }

    None
}
