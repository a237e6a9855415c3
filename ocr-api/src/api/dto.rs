use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query for `GET /ocr/predict-by-path`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PredictByPathQuery {
    /// Path of an image readable by the server process.
    pub image_path: String,
}

/// Body for `POST /ocr/predict-by-base64`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Base64Request {
    /// Base64-encoded JPEG or PNG bytes. A `data:image/...;base64,` prefix is accepted.
    pub base64_str: String,
}

/// Query for `GET /ocr/predict-by-url`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PredictByUrlQuery {
    /// `http` or `https` URL of a JPEG or PNG image.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Multipart form for `POST /ocr/predict-by-file`. Documentation only.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct FileUploadForm {
    /// Image file; the name must end in `.jpg` or `.png`.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
