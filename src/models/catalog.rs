// Catalog records - products and support users known to the assistant
//
// Field names follow the catalog files (and the ticket form), so they are kept
// in Portuguese snake_case on the wire.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A product the reports can be filed against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Project name shown to users
    pub nome_projeto: String,
    #[serde(default)]
    pub setor: Option<String>,
}

/// A support user that may be mentioned in a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Support display name
    pub nome_suporte: String,
    #[serde(default)]
    pub setor: Option<String>,
    /// Discord handle without the leading `@`
    #[serde(default)]
    pub usuario_discord: Option<String>,
}

/// Accept both `"42"` and `42` as record IDs; everything is compared as a string.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
