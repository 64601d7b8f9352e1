use serde::{Deserialize, Deserializer, Serialize};

use crate::oracle::errors::OracleError;

pub const DEFAULT_SHIPPING_CATEGORY: &str = "medium";
pub const DEFAULT_EXPLANATION: &str = "Environmental impact analysis completed.";

/// The oracle's structured verdict on a product.
///
/// Optional keys (lists, category, explanation) fall back to defaults when
/// missing or `null`; a blank category or explanation counts as missing.
/// `material_score` does not: a judgment without it parses
/// fine but cannot be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleJudgment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub detected_materials: Vec<String>,
    #[serde(default)]
    pub material_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sustain_certs: Vec<String>,
    #[serde(
        default = "default_shipping_category",
        deserialize_with = "null_as_shipping_default"
    )]
    pub shipping_weight_category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub eco_friendly_keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub eco_warnings: Vec<String>,
    #[serde(default = "default_explanation", deserialize_with = "null_as_explanation")]
    pub explanation: String,
}

fn default_shipping_category() -> String {
    DEFAULT_SHIPPING_CATEGORY.to_string()
}

fn default_explanation() -> String {
    DEFAULT_EXPLANATION.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

fn null_as_shipping_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(deserializer)?.unwrap_or_else(default_shipping_category))
}

fn null_as_explanation<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(deserializer)?.unwrap_or_else(default_explanation))
}

/// Parse the oracle's message content as a judgment.
///
/// The content must be exactly one JSON object. Surrounding prose, markdown
/// fences, truncation and wrongly typed fields are all format errors.
pub fn parse_judgment(content: &str) -> Result<OracleJudgment, OracleError> {
    serde_json::from_str(content.trim()).map_err(|e| OracleError::Format(e.to_string()))
}
