//! OCR (Optical Character Recognition) Module
//!
//! Wraps the pretrained recognition engine that does the actual work. This
//! crate never looks inside recognition; it hands the engine an input and
//! reads back pages of lines.
//!
//! # Architecture
//!
//! - `OcrEngine` trait: blocking detect + classify + recognize call
//! - `TesseractEngine`: the engine used in production, via leptess
//! - `OcrProvider`: the shared service object; runs the engine on the
//!   blocking pool with a timeout and degrades gracefully when the engine
//!   cannot be loaded
//! - `project_text`: drops geometry and confidence, keeps line text
//!
//! # Configuration
//!
//! Controlled via `OcrConfig` (see `config.rs`):
//! - `language`: `OCR_LANGUAGE`, default `ch`
//! - `tessdata_path`: directory holding the traineddata files
//! - `timeout_secs`: upper bound for a single recognition call
//! - `angle_classification`: orientation detection before recognition
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr);
//! let lines = ocr.extract_text(OcrInput::Image(image)).await?;
//! ```

mod engine;
mod projection;
mod provider;
mod tesseract;

pub use engine::{OcrEngine, OcrInput, OcrOutput, OcrPage, Point, Quad, RecognitionLine};
pub use projection::project_text;
pub use provider::OcrProvider;
pub use tesseract::{tesseract_language, TesseractEngine};
