pub mod dto;
mod extractors;
pub mod handlers;
pub mod openapi;
pub mod response;
mod routes;
mod state;

pub use response::ApiResponse;
pub use routes::create_router;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{Config, FetchConfig, OcrConfig, ServerConfig};
    use crate::error::Result;
    use crate::input::{decode_image, test_images};
    use crate::ocr::{OcrEngine, OcrInput, OcrOutput, OcrProvider, Quad, RecognitionLine};

    /// Answers every decodable image with two lines, except 1x1 images which
    /// contain no text. Paths are read from disk like a real engine would.
    struct ScriptedEngine;

    impl OcrEngine for ScriptedEngine {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn recognize(&self, input: OcrInput) -> Result<OcrOutput> {
            let image = match input {
                OcrInput::Path(path) => decode_image(&std::fs::read(path)?)?,
                OcrInput::Image(image) => image,
            };

            if image.width() == 1 && image.height() == 1 {
                return Ok(OcrOutput::single_page(Vec::new()));
            }

            Ok(OcrOutput::single_page(vec![
                Some(RecognitionLine {
                    geometry: Quad::from_rect(0.0, 0.0, 40.0, 10.0),
                    text: "TOTAL".to_string(),
                    confidence: 0.99,
                }),
                None,
                Some(RecognitionLine {
                    geometry: Quad::from_rect(0.0, 12.0, 40.0, 10.0),
                    text: "42.00".to_string(),
                    confidence: 0.87,
                }),
            ]))
        }
    }

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                max_upload_bytes: 1024 * 1024,
            },
            ocr: OcrConfig {
                language: "en".to_string(),
                tessdata_path: None,
                timeout_secs: 10,
                angle_classification: true,
            },
            fetch: FetchConfig {
                timeout_secs: 5,
                max_bytes: 1024 * 1024,
                max_redirects: 2,
            },
        }
    }

    fn test_state() -> AppState {
        let config = test_config();
        let ocr = OcrProvider::with_engine(Arc::new(ScriptedEngine), &config.ocr);
        AppState::new(config, ocr).unwrap()
    }

    async fn send(request: Request<Body>) -> serde_json::Value {
        let response = create_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_upload(field: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "ocr-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/ocr/predict-by-file")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn success(lines: &[&str]) -> serde_json::Value {
        json!({
            "resultcode": 200,
            "success": true,
            "message": "Success",
            "data": lines,
        })
    }

    #[tokio::test]
    async fn predict_by_base64_returns_text_only() {
        let encoded = STANDARD.encode(test_images::jpeg());
        let json = send(post_json(
            "/ocr/predict-by-base64",
            json!({ "base64_str": encoded }),
        ))
        .await;
        assert_eq!(json, success(&["TOTAL", "42.00"]));
    }

    #[tokio::test]
    async fn predict_by_base64_blank_png_has_no_text() {
        let encoded = STANDARD.encode(test_images::png());
        let json = send(post_json(
            "/ocr/predict-by-base64",
            json!({ "base64_str": encoded }),
        ))
        .await;
        assert_eq!(json, success(&[]));
    }

    #[tokio::test]
    async fn predict_by_base64_malformed_payload() {
        let json = send(post_json(
            "/ocr/predict-by-base64",
            json!({ "base64_str": "***definitely not base64***" }),
        ))
        .await;
        assert_eq!(json["resultcode"], 500);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], json!([]));
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid base64 payload"));
    }

    #[tokio::test]
    async fn predict_by_base64_missing_field_is_validation_failure() {
        let json = send(post_json("/ocr/predict-by-base64", json!({}))).await;
        assert_eq!(
            json,
            json!({
                "resultcode": 400,
                "success": false,
                "message": "Parameter validation failed: body -> base64_str: Field required",
                "data": [],
            })
        );
    }

    #[tokio::test]
    async fn predict_by_base64_syntax_error_is_validation_failure() {
        let request = Request::builder()
            .method("POST")
            .uri("/ocr/predict-by-base64")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let json = send(request).await;
        assert_eq!(json["resultcode"], 400);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn predict_by_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("scan.jpg");
        std::fs::write(&file, test_images::jpeg()).unwrap();

        let uri = format!(
            "/ocr/predict-by-path?image_path={}",
            file.to_str().unwrap()
        );
        let json = send(get(&uri)).await;
        assert_eq!(json, success(&["TOTAL", "42.00"]));
    }

    #[tokio::test]
    async fn predict_by_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");

        let uri = format!(
            "/ocr/predict-by-path?image_path={}",
            missing.to_str().unwrap()
        );
        let json = send(get(&uri)).await;
        assert_eq!(json["resultcode"], 500);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], json!([]));
        assert!(json["message"].as_str().unwrap().starts_with("IO error:"));
    }

    #[tokio::test]
    async fn predict_by_path_missing_query_is_validation_failure() {
        let json = send(get("/ocr/predict-by-path")).await;
        assert_eq!(
            json["message"],
            "Parameter validation failed: query -> image_path: Field required"
        );
        assert_eq!(json["resultcode"], 400);
    }

    #[tokio::test]
    async fn predict_by_file_accepts_png() {
        let json = send(multipart_upload("file", "receipt.png", &test_images::encode(
            image::ImageFormat::Png,
            16,
            16,
        )))
        .await;
        assert_eq!(json, success(&["TOTAL", "42.00"]));
    }

    #[tokio::test]
    async fn predict_by_file_rejects_other_extensions() {
        // Valid PNG bytes still fail: the name decides.
        let json = send(multipart_upload("file", "doc.txt", &test_images::png())).await;
        assert_eq!(
            json,
            json!({
                "resultcode": 500,
                "success": false,
                "message": "Please upload a .jpg or .png image",
                "data": [],
            })
        );
    }

    #[tokio::test]
    async fn predict_by_file_undecodable_bytes() {
        let json = send(multipart_upload("file", "broken.jpg", b"not really a jpeg")).await;
        assert_eq!(json["resultcode"], 500);
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to decode image"));
    }

    #[tokio::test]
    async fn predict_by_file_without_file_field() {
        let json = send(multipart_upload("attachment", "receipt.png", &test_images::png())).await;
        assert_eq!(json["resultcode"], 400);
        assert_eq!(
            json["message"],
            "Parameter validation failed: body -> file: Field required"
        );
    }

    #[tokio::test]
    async fn predict_by_file_without_multipart_body() {
        let json = send(post_json("/ocr/predict-by-file", json!({"file": "x"}))).await;
        assert_eq!(json["resultcode"], 400);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn oversized_json_body_is_validation_failure() {
        let limit = test_config().server.max_upload_bytes;
        let padding = "A".repeat(limit + 1024);
        let json = send(post_json(
            "/ocr/predict-by-base64",
            json!({ "base64_str": padding }),
        ))
        .await;
        assert_eq!(json["resultcode"], 400);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], json!([]));
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("Parameter validation failed: body:"));
    }

    #[tokio::test]
    async fn oversized_upload_is_validation_failure() {
        let limit = test_config().server.max_upload_bytes;
        let json = send(multipart_upload("file", "huge.png", &vec![0u8; limit + 1024])).await;
        assert_eq!(json["resultcode"], 400);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], json!([]));
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("Parameter validation failed: body:"));
    }

    #[tokio::test]
    async fn predict_by_url_fetches_and_recognizes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scan.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(test_images::jpeg(), "image/jpeg"))
            .mount(&server)
            .await;

        let uri = format!("/ocr/predict-by-url?imageUrl={}/scan.jpg", server.uri());
        let json = send(get(&uri)).await;
        assert_eq!(json, success(&["TOTAL", "42.00"]));
    }

    #[tokio::test]
    async fn predict_by_url_rejects_non_image_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(b"<!doctype html>".to_vec(), "image/jpeg"),
            )
            .mount(&server)
            .await;

        let uri = format!("/ocr/predict-by-url?imageUrl={}/page", server.uri());
        let json = send(get(&uri)).await;
        assert_eq!(json["resultcode"], 500);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Please upload a .jpg or .png image");
    }

    #[tokio::test]
    async fn predict_by_url_missing_query_is_validation_failure() {
        let json = send(get("/ocr/predict-by-url?image_url=http://example.com/a.png")).await;
        assert_eq!(
            json["message"],
            "Parameter validation failed: query -> imageUrl: Field required"
        );
    }

    #[tokio::test]
    async fn unavailable_engine_reports_failure_envelope() {
        let config = test_config();
        let ocr = OcrProvider::unavailable("no traineddata for 'xyz'", &config.ocr);
        let app = create_router(AppState::new(config, ocr).unwrap());

        let encoded = STANDARD.encode(test_images::jpeg());
        let response = app
            .oneshot(post_json(
                "/ocr/predict-by-base64",
                json!({ "base64_str": encoded }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["resultcode"], 500);
        assert_eq!(json["message"], "OCR unavailable: no traineddata for 'xyz'");
    }

    #[tokio::test]
    async fn health_omits_engine_when_unavailable() {
        let config = test_config();
        let ocr = OcrProvider::unavailable("no traineddata", &config.ocr);
        let app = create_router(AppState::new(config, ocr).unwrap());

        let response = app.oneshot(get("/health")).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json["ocr"],
            json!({ "status": "unavailable", "language": "en" })
        );
    }

    #[tokio::test]
    async fn health_reports_engine() {
        let json = send(get("/health")).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["ocr"]["status"], "available");
        assert_eq!(json["ocr"]["engine"], "scripted");
        assert_eq!(json["ocr"]["language"], "en");
    }

    #[tokio::test]
    async fn openapi_json_lists_ocr_routes() {
        let json = send(get("/openapi.json")).await;
        let version = json["openapi"]
            .as_str()
            .expect("openapi field should be a string");
        assert!(version.starts_with('3'), "got: {version}");
        for route in [
            "/ocr/predict-by-path",
            "/ocr/predict-by-base64",
            "/ocr/predict-by-file",
            "/ocr/predict-by-url",
        ] {
            assert!(json["paths"].get(route).is_some(), "missing {route}");
        }
    }
}
