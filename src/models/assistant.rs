// Assistant request/response models

use super::catalog::{Product, User};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Confidence reported on every successful response until a real score exists
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.95;

/// Report category understood by the ticket form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    #[default]
    Bug,
    Melhoria,
    Requisito,
}

impl Category {
    /// Returns all categories in prompt order
    pub fn all() -> &'static [Category] {
        &[Category::Bug, Category::Melhoria, Category::Requisito]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bug => "BUG",
            Category::Melhoria => "MELHORIA",
            Category::Requisito => "REQUISITO",
        }
    }

    /// Coerce a free-form label coming from the model.
    /// Anything that is not one of the known categories becomes `Bug`.
    pub fn coerce(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUG" => Ok(Category::Bug),
            "MELHORIA" => Ok(Category::Melhoria),
            "REQUISITO" => Ok(Category::Requisito),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

/// Input of a single assistant run
#[derive(Debug, Clone, Default)]
pub struct AssistantRequest {
    pub description: Option<String>,
    pub audio: Option<Vec<u8>>,
    pub audio_mime_type: Option<String>,
}

impl AssistantRequest {
    pub fn from_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }

    /// Description with surrounding whitespace removed, if anything is left
    pub fn trimmed_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    pub fn has_description(&self) -> bool {
        self.trimmed_description().is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.audio.as_ref().map_or(false, |a| !a.is_empty())
    }
}

/// Raw JSON object the model is asked to produce.
///
/// Every field is lenient: missing or `null` values deserialize to empty, and IDs
/// may arrive as numbers. Completeness is checked by the normalizer, not here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantDataFromAi {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub additional_information: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub user_ids: Vec<String>,
}

/// Final form data returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantData {
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_ids: Vec<String>,
    /// Catalog entry matching `product_id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    /// Catalog entries matching `user_ids`, in catalog order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<User>,
}

/// Envelope for every `/api/assistant` reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AssistantData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssistantResponse {
    pub fn ok(data: AssistantData, processed_in: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            confidence: Some(PLACEHOLDER_CONFIDENCE),
            processed_in: Some(processed_in),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>, processed_in: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            confidence: None,
            processed_in,
            error: Some(error.into()),
        }
    }
}

// =============================================================================
// Lenient deserializers for model output
// =============================================================================

fn value_to_id(value: Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?.unwrap_or_default())
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_id(Value::deserialize(deserializer)?))
}

fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(value_to_id).collect(),
        single => value_to_id(single).into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_coerce() {
        assert_eq!(Category::coerce("bug"), Category::Bug);
        assert_eq!(Category::coerce(" melhoria "), Category::Melhoria);
        assert_eq!(Category::coerce("Requisito"), Category::Requisito);
        assert_eq!(Category::coerce("FEATURE"), Category::Bug);
        assert_eq!(Category::coerce(""), Category::Bug);
    }

    #[test]
    fn test_category_serializes_uppercase() {
        let json = serde_json::to_string(&Category::Melhoria).unwrap();
        assert_eq!(json, "\"MELHORIA\"");
    }

    #[test]
    fn test_request_whitespace_description_is_empty() {
        let request = AssistantRequest::from_description("   \n ");
        assert!(!request.has_description());
        assert!(!request.has_audio());
    }

    #[test]
    fn test_request_empty_audio_is_absent() {
        let request = AssistantRequest {
            audio: Some(Vec::new()),
            ..Default::default()
        };
        assert!(!request.has_audio());
    }

    #[test]
    fn test_raw_output_is_lenient() {
        let raw: AssistantDataFromAi = serde_json::from_str(
            r#"{
                "title": "X > Y: Z",
                "description": null,
                "category": "bug",
                "productId": 12,
                "userIds": ["a", 3, null, ""]
            }"#,
        )
        .unwrap();

        assert_eq!(raw.title, "X > Y: Z");
        assert_eq!(raw.description, "");
        assert_eq!(raw.product_id.as_deref(), Some("12"));
        assert_eq!(raw.user_ids, vec!["a".to_string(), "3".to_string()]);
        assert!(raw.additional_information.is_none());
    }

    #[test]
    fn test_response_omits_empty_fields() {
        let response = AssistantResponse::failure("boom", Some("3ms".to_string()));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["processedIn"], "3ms");
        assert!(json.get("data").is_none());
        assert!(json.get("confidence").is_none());
    }
}
