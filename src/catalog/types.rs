//! Typed catalog records.

use serde::{Deserialize, Deserializer, Serialize};

/// A product as served by the upstream catalog.
///
/// Records are immutable once received; the proxy only reorders and
/// truncates sequences of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image: String,
}

/// A product category. Only used for id → name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

/// A company. Only used for id → name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
}

/// Accept an id as either a JSON string or a JSON number.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(serde_json::Number),
        Str(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Str(s) => s,
    })
}
