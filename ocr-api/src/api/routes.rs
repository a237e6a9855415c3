use std::any::Any;

use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;
use crate::error::OcrApiError;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let ocr = Router::new()
        .route("/predict-by-path", get(handlers::ocr::predict_by_path))
        .route("/predict-by-base64", post(handlers::ocr::predict_by_base64))
        .route("/predict-by-file", post(handlers::ocr::predict_by_file))
        .route("/predict-by-url", get(handlers::ocr::predict_by_url));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router())
        .nest("/ocr", ocr)
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .layer(CatchPanicLayer::custom(panic_to_envelope))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Last-resort handler: a panic in any handler still answers with the envelope.
fn panic_to_envelope(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Request handler panicked");
    OcrApiError::Internal(detail).into_response()
}
