use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OCR API",
        version = "1.0.0",
        description = "Text recognition over HTTP. Every OCR endpoint answers 200 OK with a result envelope.",
    ),
    paths(
        handlers::health::health_check,
        handlers::ocr::predict_by_path,
        handlers::ocr::predict_by_base64,
        handlers::ocr::predict_by_file,
        handlers::ocr::predict_by_url,
    ),
    components(schemas(
        response::ApiResponse,
        dto::Base64Request,
        dto::FileUploadForm,
        handlers::health::HealthData,
        handlers::health::OcrStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "OCR", description = "Text recognition from paths, base64, uploads and URLs"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
