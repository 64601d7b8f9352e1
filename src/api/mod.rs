pub mod dtos;
pub mod handlers;

use axum::{
    Router,
    extract::Request,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::dtos::{ErrorResponse, ProductUrlRequest},
    app_state::AppState,
    extractor::ProductRaw,
    health::{self, HealthResponse},
    scoring::EcoScoreResult,
};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::extract, handlers::analyze, health::health_check),
    components(schemas(
        ProductUrlRequest,
        ProductRaw,
        EcoScoreResult,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "products", description = "Product extraction and EcoScore analysis"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Routes without middleware, for tests that drive handlers directly.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/extract", post(handlers::extract))
        .route("/analyze", post(handlers::analyze))
        .route("/healthz", get(health::health_check))
}

/// The full service: routes, API docs, request ids, tracing and CORS.
pub fn router(state: AppState) -> Router {
    routes()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                // The browser front-end is served from a different origin.
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
