// Response normalizer - turns raw model text into validated form data

use super::error::AssistantError;
use super::heuristics::check_plausibility;
use crate::catalog::Catalog;
use crate::models::{AssistantData, AssistantDataFromAi, Category};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static JSON_OBJECT_PATTERN: OnceLock<Regex> = OnceLock::new();

/// First `{` through last `}`
fn get_json_object_pattern() -> &'static Regex {
    JSON_OBJECT_PATTERN.get_or_init(|| Regex::new(r"\{[\s\S]*\}").unwrap())
}

/// Parse text as a JSON object. Arrays and scalars are rejected even though
/// serde would happily map a sequence onto the struct fields.
fn parse_object(text: &str) -> Option<AssistantDataFromAi> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value)
            .map_err(|e| log::debug!("[normalizer] Reply object has unexpected shape: {}", e))
            .ok(),
        _ => None,
    }
}

/// Parse the model reply, falling back to the outermost `{...}` block when the
/// reply carries extra prose or code fences around the JSON.
pub fn extract_reply(text: &str) -> Result<AssistantDataFromAi, AssistantError> {
    if let Some(data) = parse_object(text.trim()) {
        return Ok(data);
    }

    get_json_object_pattern()
        .find(text)
        .and_then(|block| parse_object(block.as_str()))
        .ok_or(AssistantError::InvalidJson)
}

/// title, description and category must all be non-blank
pub fn check_completeness(data: &AssistantDataFromAi) -> Result<(), AssistantError> {
    let missing = [&data.title, &data.description, &data.category]
        .iter()
        .any(|field| field.trim().is_empty());

    if missing {
        Err(AssistantError::Incomplete)
    } else {
        Ok(())
    }
}

/// Coerce the category and attach catalog records for the identified IDs
pub fn resolve(data: AssistantDataFromAi, catalog: &Catalog) -> AssistantData {
    let product = data
        .product_id
        .as_deref()
        .and_then(|id| catalog.find_product(id))
        .cloned();
    let users = catalog.resolve_users(&data.user_ids);

    if data.product_id.is_some() && product.is_none() {
        log::debug!(
            "[normalizer] Dropping unknown product id {:?}",
            data.product_id
        );
    }
    if users.len() < data.user_ids.len() {
        log::debug!(
            "[normalizer] Resolved {} of {} user ids",
            users.len(),
            data.user_ids.len()
        );
    }

    AssistantData {
        title: data.title,
        description: data.description,
        category: Category::coerce(&data.category),
        additional_information: data.additional_information,
        product_id: data.product_id,
        user_ids: data.user_ids,
        product,
        users,
    }
}

/// Full pipeline: extract, check completeness, check plausibility, resolve
pub fn normalize_reply(text: &str, catalog: &Catalog) -> Result<AssistantData, AssistantError> {
    let data = extract_reply(text)?;
    check_completeness(&data)?;

    if let Some(reason) = check_plausibility(&data) {
        log::info!("[normalizer] Rejecting reply: {}", reason);
        return Err(AssistantError::InsufficientContent(reason));
    }

    Ok(resolve(data, catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Product, User};

    const DESCRIPTION: &str = "Comportamento atual:\n\nAo emitir a nota fiscal o sistema trava na tela de impressão.\n\nComportamento esperado:\n\nA nota deve ser impressa normalmente.\n\nPassos para reproduzir:\n  1. Acessar Fiscal > NF-e\n  2. Emitir uma nota\n  3. Clicar em Imprimir";

    fn catalog() -> Catalog {
        Catalog::new(
            vec![Product {
                id: "1".to_string(),
                nome_projeto: "SOFTCOMSHOP".to_string(),
                setor: None,
            }],
            vec![
                User {
                    id: "10".to_string(),
                    nome_suporte: "Ana".to_string(),
                    setor: None,
                    usuario_discord: None,
                },
                User {
                    id: "11".to_string(),
                    nome_suporte: "Bruno".to_string(),
                    setor: None,
                    usuario_discord: None,
                },
            ],
        )
    }

    fn reply_json(category: &str, product_id: serde_json::Value, user_ids: serde_json::Value) -> String {
        serde_json::json!({
            "title": "SOFTCOMSHOP > Fiscal > NF-e: sistema trava ao imprimir",
            "description": DESCRIPTION,
            "category": category,
            "additionalInformation": "",
            "productId": product_id,
            "userIds": user_ids,
        })
        .to_string()
    }

    #[test]
    fn test_extract_direct_json() {
        let data = extract_reply(r#"{"title": "a", "description": "b", "category": "BUG"}"#).unwrap();
        assert_eq!(data.title, "a");
    }

    #[test]
    fn test_extract_json_wrapped_in_prose() {
        let text = "Claro! Aqui está o resultado:\n```json\n{\"title\": \"a\", \"description\": \"b\", \"category\": \"MELHORIA\"}\n```\nEspero ter ajudado.";
        let data = extract_reply(text).unwrap();
        assert_eq!(data.category, "MELHORIA");
    }

    #[test]
    fn test_extract_no_json() {
        let err = extract_reply("Desculpe, não consegui entender.").unwrap_err();
        assert!(matches!(err, AssistantError::InvalidJson));
    }

    #[test]
    fn test_extract_broken_block() {
        let err = extract_reply("resultado: {\"title\": \"a\", }").unwrap_err();
        assert!(matches!(err, AssistantError::InvalidJson));
    }

    #[test]
    fn test_extract_array_uses_inner_object() {
        let text = r#"[{"title": "a", "description": "b", "category": "BUG"}]"#;
        let data = extract_reply(text).unwrap();
        assert_eq!(data.title, "a");
    }

    #[test]
    fn test_incomplete_reply() {
        let text = r#"{"title": "a", "description": "   ", "category": "BUG"}"#;
        let err = normalize_reply(text, &catalog()).unwrap_err();
        assert!(matches!(err, AssistantError::Incomplete));

        let text = r#"{"title": "a", "description": "b"}"#;
        let err = normalize_reply(text, &catalog()).unwrap_err();
        assert!(matches!(err, AssistantError::Incomplete));
    }

    #[test]
    fn test_unknown_category_becomes_bug() {
        let text = reply_json("FEATURE", serde_json::Value::Null, serde_json::json!([]));
        let data = normalize_reply(&text, &catalog()).unwrap();
        assert_eq!(data.category, Category::Bug);
    }

    #[test]
    fn test_lowercase_category_uppercased() {
        let text = reply_json("requisito", serde_json::Value::Null, serde_json::json!([]));
        let data = normalize_reply(&text, &catalog()).unwrap();
        assert_eq!(data.category, Category::Requisito);
    }

    #[test]
    fn test_resolves_product_and_users() {
        let text = reply_json("BUG", serde_json::json!("1"), serde_json::json!(["11", "99", "10"]));
        let data = normalize_reply(&text, &catalog()).unwrap();

        assert_eq!(data.product.unwrap().nome_projeto, "SOFTCOMSHOP");
        let ids: Vec<&str> = data.users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "11"]);
    }

    #[test]
    fn test_unknown_product_is_omitted() {
        let text = reply_json("BUG", serde_json::json!("404"), serde_json::json!([]));
        let data = normalize_reply(&text, &catalog()).unwrap();

        assert!(data.product.is_none());
        assert!(data.users.is_empty());
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("product").is_none());
        assert!(json.get("users").is_none());
    }

    #[test]
    fn test_short_description_rejected() {
        let text = r#"{"title": "SOFTCOMSHOP > Login: erro", "description": "Erro no login.", "category": "BUG", "productId": "1"}"#;
        let err = normalize_reply(text, &catalog()).unwrap_err();
        assert!(matches!(err, AssistantError::InsufficientContent(_)));
    }
}
