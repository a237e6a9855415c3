use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::response::{ApiResponse, ErrorCode};

#[derive(Error, Debug)]
pub enum OcrApiError {
    #[error("Parameter validation failed: {0}")]
    Validation(String),

    #[error("Please upload a .jpg or .png image")]
    UnsupportedImage,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Remote image exceeds the {limit} byte limit")]
    ResponseTooLarge { limit: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl OcrApiError {
    /// Logical result code reported in the envelope body.
    ///
    /// Only failures raised while binding request parameters count as
    /// validation failures; everything a handler raises is reported as 500.
    pub fn result_code(&self) -> ErrorCode {
        match self {
            OcrApiError::Validation(_) => ErrorCode::BadRequest,
            _ => ErrorCode::InternalError,
        }
    }
}

impl From<url::ParseError> for OcrApiError {
    fn from(err: url::ParseError) -> Self {
        OcrApiError::InvalidUrl(err.to_string())
    }
}

impl IntoResponse for OcrApiError {
    fn into_response(self) -> Response {
        ApiResponse::from(self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, OcrApiError>;
