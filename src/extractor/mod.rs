pub mod model;

#[cfg(test)]
mod tests;

pub use model::ProductRaw;

use scraper::{Html, Selector};
use std::sync::LazyLock;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#productTitle").unwrap());

static FEATURE_BULLETS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#feature-bullets").unwrap());

static SUSTAINABILITY_BADGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#climatePledgeFriendly").unwrap());

/// Pull the product fields out of raw page markup.
///
/// Never fails: a node that isn't there just yields an empty field. Text is
/// only trimmed, not cleaned up or capped, so a huge feature list becomes a
/// huge oracle prompt.
pub fn extract(markup: &str) -> ProductRaw {
    let document = Html::parse_document(markup);

    ProductRaw {
        title: text_of(&document, &TITLE),
        description: text_of(&document, &FEATURE_BULLETS),
        features: text_of(&document, &SUSTAINABILITY_BADGE),
    }
}

fn text_of(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}
