use std::path::PathBuf;

use axum::extract::multipart::Multipart;
use axum::extract::multipart::MultipartRejection;
use axum::extract::State;

use crate::api::dto::{Base64Request, PredictByPathQuery, PredictByUrlQuery};
use crate::api::extractors::{map_multipart_error, AppJson, AppQuery};
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::error::{OcrApiError, Result};
use crate::input::{accepts_file_name, decode_base64, decode_image};
use crate::ocr::OcrInput;

const FILE_FIELD: &str = "file";

/// `GET /ocr/predict-by-path`
#[utoipa::path(
    get,
    path = "/ocr/predict-by-path",
    tag = "OCR",
    summary = "Recognize a local image",
    params(PredictByPathQuery),
    responses(
        (status = 200, description = "Outcome envelope; check `resultcode`", body = ApiResponse),
    )
)]
pub async fn predict_by_path(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PredictByPathQuery>,
) -> ApiResponse {
    let input = OcrInput::Path(PathBuf::from(query.image_path));
    state.ocr.extract_text(input).await.into()
}

/// `POST /ocr/predict-by-base64`
#[utoipa::path(
    post,
    path = "/ocr/predict-by-base64",
    tag = "OCR",
    summary = "Recognize base64 image data",
    request_body = Base64Request,
    responses(
        (status = 200, description = "Outcome envelope; check `resultcode`", body = ApiResponse),
    )
)]
pub async fn predict_by_base64(
    State(state): State<AppState>,
    AppJson(request): AppJson<Base64Request>,
) -> ApiResponse {
    let outcome = match decode_base64(&request.base64_str) {
        Ok(image) => state.ocr.extract_text(OcrInput::Image(image)).await,
        Err(e) => Err(e),
    };
    outcome.into()
}

/// `POST /ocr/predict-by-file`
#[utoipa::path(
    post,
    path = "/ocr/predict-by-file",
    tag = "OCR",
    summary = "Recognize an uploaded file",
    request_body(content = crate::api::dto::FileUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Outcome envelope; check `resultcode`", body = ApiResponse),
    )
)]
pub async fn predict_by_file(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> ApiResponse {
    match multipart {
        Ok(multipart) => recognize_upload(&state, multipart).await.into(),
        Err(rejection) => OcrApiError::from(rejection).into(),
    }
}

async fn recognize_upload(state: &AppState, mut multipart: Multipart) -> Result<Vec<String>> {
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // The name is checked before a single byte of the body is read.
        let file_name = field.file_name().unwrap_or_default().to_string();
        if !accepts_file_name(&file_name) {
            return Err(OcrApiError::UnsupportedImage);
        }

        let bytes = field.bytes().await.map_err(map_multipart_error)?;
        tracing::debug!(file_name = %file_name, len = bytes.len(), "Received upload");

        let image = decode_image(&bytes)?;
        return state.ocr.extract_text(OcrInput::Image(image)).await;
    }

    Err(OcrApiError::Validation(format!(
        "body -> {FILE_FIELD}: Field required"
    )))
}

/// `GET /ocr/predict-by-url`
#[utoipa::path(
    get,
    path = "/ocr/predict-by-url",
    tag = "OCR",
    summary = "Recognize an image URL",
    params(PredictByUrlQuery),
    responses(
        (status = 200, description = "Outcome envelope; check `resultcode`", body = ApiResponse),
    )
)]
pub async fn predict_by_url(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PredictByUrlQuery>,
) -> ApiResponse {
    let outcome = match state.fetcher.fetch_image(&query.image_url).await {
        Ok(image) => state.ocr.extract_text(OcrInput::Image(image)).await,
        Err(e) => Err(e),
    };
    outcome.into()
}
