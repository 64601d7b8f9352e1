use std::fs;

use crate::extractor::{ProductRaw, extract};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_product_page() {
    let product = extract(&fixture("product.html"));

    assert_eq!(
        product.title,
        "Bamboo Toothbrush 4-Pack, Biodegradable Handles, BPA-Free Bristles"
    );
    assert!(product.description.starts_with("100% biodegradable bamboo handle"));
    assert!(product.description.contains("Plastic-free compostable packaging"));
    assert!(product.description.ends_with("Nylon-6 bristles"));
    assert!(product.features.starts_with("Climate Pledge Friendly"));
    assert!(product.features.ends_with("Compact by Design"));
}

#[test]
fn test_extract_ignores_page_title_and_scripts() {
    let product = extract(&fixture("product.html"));

    assert!(!product.title.contains("Amazon.com"));
    assert!(!product.description.contains("ue_t0"));
}

#[test]
fn test_client_rendered_shell_yields_empty_fields() {
    let product = extract(&fixture("shell.html"));

    assert_eq!(product, ProductRaw::default());
    assert!(product.is_empty());
}

#[test]
fn test_missing_nodes_are_independent() {
    let html = r#"<html><body><span id="productTitle"> Steel Water Bottle </span></body></html>"#;
    let product = extract(html);

    assert_eq!(product.title, "Steel Water Bottle");
    assert_eq!(product.description, "");
    assert_eq!(product.features, "");
    assert!(!product.is_empty());
}

#[test]
fn test_empty_and_garbage_input() {
    assert!(extract("").is_empty());
    assert!(extract("\u{0}<<<>>>&&&").is_empty());
}

#[test]
fn test_malformed_html() {
    let html = "<html><body><div id=\"feature-bullets\"><ul><li>Recycled polyester<li>Machine washable";
    let product = extract(html);

    assert!(product.description.contains("Recycled polyester"));
    assert!(product.description.contains("Machine washable"));
}

#[test]
fn test_inner_whitespace_is_preserved() {
    let html = "<div id=\"climatePledgeFriendly\">\n  Organic   cotton\n</div>";
    let product = extract(html);

    assert_eq!(product.features, "Organic   cotton");
}

#[test]
fn test_summary_layout() {
    let product = ProductRaw {
        title: "Mug".to_string(),
        description: "Ceramic".to_string(),
        features: String::new(),
    };

    assert_eq!(
        product.summary(),
        "-Title: Mug\n-Description: Ceramic\n-Sustainability Features: "
    );
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = extract(&html);
        }

        #[test]
        fn test_fields_are_trimmed(inner in "[ \\t\\na-z]{0,40}") {
            let html = format!("<span id=\"productTitle\">{inner}</span>");
            let product = extract(&html);
            prop_assert_eq!(product.title.as_str(), product.title.trim());
        }
    }
}
