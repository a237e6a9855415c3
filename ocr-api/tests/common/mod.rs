use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use ocr_api::api::AppState;
use ocr_api::config::{Config, FetchConfig, OcrConfig, ServerConfig};
use ocr_api::error::Result;
use ocr_api::ocr::{OcrEngine, OcrInput, OcrOutput, OcrProvider, Quad, RecognitionLine};

/// Encode a solid image in the given format.
pub fn image_bytes(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap_or_else(|e| panic!("Failed to encode {format:?} fixture: {e}"));
    bytes
}

/// Reports the image width as the only line and counts its invocations.
#[derive(Default)]
pub struct CountingEngine {
    pub calls: AtomicUsize,
}

impl OcrEngine for CountingEngine {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn recognize(&self, input: OcrInput) -> Result<OcrOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let width = match input {
            OcrInput::Image(image) => image.width(),
            OcrInput::Path(path) => {
                let bytes = std::fs::read(path)?;
                image::load_from_memory(&bytes)?.width()
            }
        };

        Ok(OcrOutput::single_page(vec![Some(RecognitionLine {
            geometry: Quad::from_rect(0.0, 0.0, width as f32, 10.0),
            text: format!("width {width}"),
            confidence: 0.5,
        })]))
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes: 2 * 1024 * 1024,
        },
        ocr: OcrConfig {
            language: "ch".to_string(),
            tessdata_path: None,
            timeout_secs: 10,
            angle_classification: true,
        },
        fetch: FetchConfig {
            timeout_secs: 5,
            max_bytes: 2 * 1024 * 1024,
            max_redirects: 2,
        },
    }
}

pub fn state_with(engine: Arc<dyn OcrEngine>) -> AppState {
    let config = test_config();
    let ocr = OcrProvider::with_engine(engine, &config.ocr);
    AppState::new(config, ocr).expect("build state")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
