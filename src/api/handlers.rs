use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::{
    api::dtos::{
        ANALYSIS_FAILED, EXTRACTION_FAILED, ErrorResponse, INVALID_AI_RESPONSE,
        INVALID_PRODUCT_URL, MISSING_API_KEY, MISSING_URL, ProductUrlRequest,
    },
    app_state::AppState,
    extractor::ProductRaw,
    oracle::OracleCredential,
    pipeline::{InputError, PipelineError},
    scoring::EcoScoreResult,
};

#[utoipa::path(
    post,
    path = "/extract",
    tag = "products",
    request_body = ProductUrlRequest,
    responses(
        (status = 200, description = "Product fields extracted", body = ProductRaw),
        (status = 400, description = "No URL supplied", body = ErrorResponse),
        (status = 500, description = "Page could not be fetched", body = ErrorResponse)
    )
)]
pub async fn extract(
    State(state): State<AppState>,
    payload: Result<Json<ProductUrlRequest>, JsonRejection>,
) -> Response {
    let payload = request_body(payload);
    let Some(url) = payload.url() else {
        return error(StatusCode::BAD_REQUEST, MISSING_URL);
    };

    match state.pipeline.extract_product(url).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(_) => error(StatusCode::INTERNAL_SERVER_ERROR, EXTRACTION_FAILED),
    }
}

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "products",
    request_body = ProductUrlRequest,
    params(
        ("Authorization" = String, Header, description = "Bearer key for the inference service")
    ),
    responses(
        (status = 200, description = "Product scored", body = EcoScoreResult),
        (status = 400, description = "Missing or unsupported URL", body = ErrorResponse),
        (status = 401, description = "No API key supplied", body = ErrorResponse),
        (status = 500, description = "Page could not be fetched", body = ErrorResponse),
        (status = 502, description = "Inference call failed or replied badly", body = ErrorResponse)
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProductUrlRequest>, JsonRejection>,
) -> Response {
    let payload = request_body(payload);
    let Some(url) = payload.url() else {
        return error(StatusCode::BAD_REQUEST, MISSING_URL);
    };
    let Some(credential) = bearer_credential(&headers) else {
        return failure(InputError::MissingCredential.into());
    };

    match state.pipeline.analyze(url, &credential).await {
        Ok(result) => {
            info!(score = result.score, "product analyzed");
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => failure(err),
    }
}

/// An unreadable body is treated as one without a URL.
fn request_body(payload: Result<Json<ProductUrlRequest>, JsonRejection>) -> ProductUrlRequest {
    match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(
                status = %rejection.status(),
                reason = %rejection.body_text(),
                "request body rejected"
            );
            ProductUrlRequest::default()
        }
    }
}

fn bearer_credential(headers: &HeaderMap) -> Option<OracleCredential> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let key = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?;
    OracleCredential::new(key)
}

fn failure(err: PipelineError) -> Response {
    match err {
        PipelineError::Input(InputError::MissingUrl) => error(StatusCode::BAD_REQUEST, MISSING_URL),
        PipelineError::Input(InputError::MissingCredential) => {
            error(StatusCode::UNAUTHORIZED, MISSING_API_KEY)
        }
        PipelineError::Input(_) => error(StatusCode::BAD_REQUEST, INVALID_PRODUCT_URL),
        PipelineError::Fetch(_) => error(StatusCode::INTERNAL_SERVER_ERROR, EXTRACTION_FAILED),
        PipelineError::OracleTransport(_) => error(StatusCode::BAD_GATEWAY, ANALYSIS_FAILED),
        PipelineError::OracleFormat(_) | PipelineError::Score(_) => {
            error(StatusCode::BAD_GATEWAY, INVALID_AI_RESPONSE)
        }
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
