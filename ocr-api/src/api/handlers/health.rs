use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    pub language: String,
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let ocr_status = if state.ocr.is_available() {
        "available"
    } else {
        "unavailable"
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr: OcrStatus {
            status: ocr_status.to_string(),
            engine: state.ocr.engine_name().map(str::to_string),
            language: state.ocr.config().language.clone(),
        },
    })
}
