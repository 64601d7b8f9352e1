use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The handful of text fields we pull out of a product page.
///
/// Any field whose node is missing from the markup is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductRaw {
    pub title: String,
    pub description: String,
    pub features: String,
}

impl ProductRaw {
    /// Text block handed to the oracle as the product under analysis.
    pub fn summary(&self) -> String {
        format!(
            "-Title: {}\n-Description: {}\n-Sustainability Features: {}",
            self.title, self.description, self.features
        )
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.features.is_empty()
    }
}
