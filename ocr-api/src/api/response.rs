//! # Response Envelope
//!
//! Every OCR endpoint answers with the same body:
//!
//! ```json
//! {
//!   "resultcode": 200,
//!   "success": true,
//!   "message": "Success",
//!   "data": ["first line", "second line"]
//! }
//! ```
//!
//! The HTTP status is always `200 OK`. Clients read the outcome from
//! `resultcode`/`success`; `data` is empty on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{OcrApiError, Result};

pub const SUCCESS_CODE: u16 = 200;
pub const SUCCESS_MESSAGE: &str = "Success";

/// `resultcode` of a failed request. Success is not representable here, so a
/// failure envelope can never claim `success: true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request parameters failed to bind.
    BadRequest,
    /// Anything that went wrong while handling the request.
    InternalError,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::InternalError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiResponse {
    /// 200 on success, 400 on parameter validation failure, 500 otherwise.
    #[schema(example = 200)]
    pub resultcode: u16,
    pub success: bool,
    #[schema(example = "Success")]
    pub message: String,
    /// Recognized text lines in reading order.
    pub data: Vec<String>,
}

impl ApiResponse {
    pub fn success(data: Vec<String>) -> Self {
        Self {
            resultcode: SUCCESS_CODE,
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            data,
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            resultcode: code.as_u16(),
            success: false,
            message: message.into(),
            data: Vec::new(),
        }
    }
}

impl From<OcrApiError> for ApiResponse {
    fn from(err: OcrApiError) -> Self {
        ApiResponse::failure(err.result_code(), err.to_string())
    }
}

impl From<Result<Vec<String>>> for ApiResponse {
    fn from(outcome: Result<Vec<String>>) -> Self {
        match outcome {
            Ok(lines) => ApiResponse::success(lines),
            Err(err) => {
                tracing::warn!(error = %err, "OCR request failed");
                ApiResponse::from(err)
            }
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
