#![allow(dead_code)]

use axum::{Router, body::Body, http::Request, response::Response};
use serde_json::{Value, json};
use tower::ServiceExt;

use ecoscore::{api, app_state::AppState, config::Config, pipeline::EcoPipeline};

pub const PRODUCT_HTML: &str = r#"<!DOCTYPE html>
<html><head><title>Amazon.com: Cast Iron Skillet</title></head>
<body>
  <span id="productTitle">  Cast Iron Skillet, 12 inch  </span>
  <div id="feature-bullets"><ul><li>Pre-seasoned with vegetable oil</li></ul></div>
  <div id="climatePledgeFriendly">Climate Pledge Friendly</div>
</body></html>"#;

/// Config pointing the oracle at `oracle_uri` and accepting the mock host as a catalog.
pub fn test_config(oracle_uri: &str) -> Config {
    Config::default()
        .with_oracle_base_url(oracle_uri)
        .with_catalog_hosts(["127.0.0.1", "localhost", "amazon."])
}

pub fn test_app(oracle_uri: &str) -> Router {
    let pipeline = EcoPipeline::from_config(&test_config(oracle_uri)).unwrap();
    api::router(AppState::new(pipeline))
}

/// A chat-completion envelope whose message content is `content`.
pub fn chat_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

pub async fn post_json(app: Router, uri: &str, body: Value, api_key: Option<&str>) -> Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = api_key {
        request = request.header("authorization", format!("Bearer {key}"));
    }

    app.oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
