use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MISSING_URL: &str = "Missing URL";
pub const INVALID_PRODUCT_URL: &str = "Please enter a valid Amazon product URL.";
pub const MISSING_API_KEY: &str = "Missing API key";
pub const EXTRACTION_FAILED: &str = "Failed to extract product data";
pub const ANALYSIS_FAILED: &str = "Analysis failed";
pub const INVALID_AI_RESPONSE: &str = "Invalid AI response format";

/// Body of both `/extract` and `/analyze`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductUrlRequest {
    pub url: Option<String>,
}

impl ProductUrlRequest {
    /// The URL, if one was actually supplied.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
