//! Extractors whose rejections answer with the response envelope instead of
//! axum's plain-text errors.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::OcrApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(OcrApiError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(OcrApiError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for OcrApiError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

impl From<QueryRejection> for OcrApiError {
    fn from(rejection: QueryRejection) -> Self {
        match rejection {
            QueryRejection::FailedToDeserializeQueryString(err) => {
                describe_binding_failure("query", &err.body_text())
            }
            _ => OcrApiError::Validation(format!("query: {}", rejection.body_text())),
        }
    }
}

impl From<MultipartRejection> for OcrApiError {
    fn from(rejection: MultipartRejection) -> Self {
        OcrApiError::Validation(format!("body: {}", rejection.body_text()))
    }
}

/// Errors raised while streaming a multipart body. Client faults, including a
/// body over the upload limit, are binding failures like their JSON
/// counterparts; transport faults are internal.
pub(crate) fn map_multipart_error(err: MultipartError) -> OcrApiError {
    if err.status().is_client_error() {
        OcrApiError::Validation(format!("body: {}", err.body_text()))
    } else {
        OcrApiError::Internal(format!("Failed to read upload: {}", err.body_text()))
    }
}

fn map_json_rejection(rejection: JsonRejection) -> OcrApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => describe_binding_failure("body", &err.body_text()),
        JsonRejection::JsonSyntaxError(err) => {
            OcrApiError::Validation(format!("body: JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => OcrApiError::Validation(
            "body: Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(err) => {
            OcrApiError::Validation(format!("body: Failed to read request body: {}", err.body_text()))
        }
        _ => OcrApiError::Validation(format!("body: {}", rejection.body_text())),
    }
}

/// Formats a binding failure as `<location> -> <field>: Field required` when
/// serde reports a missing field, otherwise as `<location>: <detail>`.
fn describe_binding_failure(location: &str, message: &str) -> OcrApiError {
    match extract_missing_field(message) {
        Some(field) => OcrApiError::Validation(format!("{location} -> {field}: Field required")),
        None => OcrApiError::Validation(format!("{location}: {message}")),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_missing_field() {
        assert_eq!(
            extract_missing_field("Failed to deserialize query string: missing field `image_path`"),
            Some("image_path")
        );
        assert_eq!(extract_missing_field("invalid type: integer"), None);
        assert_eq!(extract_missing_field("missing field `unterminated"), None);
    }

    #[test]
    fn test_describe_binding_failure() {
        let err = describe_binding_failure("query", "missing field `imageUrl`");
        assert_eq!(
            err.to_string(),
            "Parameter validation failed: query -> imageUrl: Field required"
        );

        let err = describe_binding_failure("body", "invalid type: integer `5`, expected a string");
        assert_eq!(
            err.to_string(),
            "Parameter validation failed: body: invalid type: integer `5`, expected a string"
        );
    }
}
