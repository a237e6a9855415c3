use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::engine::{OcrEngine, OcrInput, OcrOutput};
use super::projection::project_text;
use super::tesseract::TesseractEngine;
use crate::config::OcrConfig;
use crate::error::{OcrApiError, Result};

#[derive(Clone)]
enum OcrBackend {
    Local { engine: Arc<dyn OcrEngine> },
    Unavailable { reason: String },
}

/// The process-wide OCR service handed to every handler through `AppState`.
#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

impl OcrProvider {
    /// Builds the Tesseract engine. A missing language pack does not stop the
    /// server; the provider degrades and every request reports the reason.
    pub fn new(config: &OcrConfig) -> Self {
        let backend = match TesseractEngine::new(config) {
            Ok(engine) => {
                info!(
                    language = %engine.language(),
                    angle_classification = config.angle_classification,
                    "Tesseract OCR initialized"
                );
                OcrBackend::Local {
                    engine: Arc::new(engine),
                }
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    pub fn with_engine(engine: Arc<dyn OcrEngine>, config: &OcrConfig) -> Self {
        Self {
            backend: OcrBackend::Local { engine },
            config: config.clone(),
        }
    }

    pub fn unavailable(reason: impl Into<String>, config: &OcrConfig) -> Self {
        Self {
            backend: OcrBackend::Unavailable {
                reason: reason.into(),
            },
            config: config.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    pub fn engine_name(&self) -> Option<&'static str> {
        match &self.backend {
            OcrBackend::Local { engine } => Some(engine.name()),
            OcrBackend::Unavailable { .. } => None,
        }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    pub async fn recognize(&self, input: OcrInput) -> Result<OcrOutput> {
        let engine = match &self.backend {
            OcrBackend::Local { engine } => Arc::clone(engine),
            OcrBackend::Unavailable { reason } => {
                return Err(OcrApiError::OcrUnavailable(reason.clone()))
            }
        };

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let task = tokio::task::spawn_blocking(move || engine.recognize(input));

        // A timed-out task keeps running on the blocking pool until the engine returns.
        match tokio::time::timeout(timeout_duration, task).await {
            Ok(joined) => joined.map_err(|e| OcrApiError::Ocr(format!("OCR task panicked: {e}")))?,
            Err(_) => Err(OcrApiError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    /// Runs recognition and keeps only the text of each line.
    pub async fn extract_text(&self, input: OcrInput) -> Result<Vec<String>> {
        let output = self.recognize(input).await?;
        Ok(project_text(&output))
    }
}
