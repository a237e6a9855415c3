use std::path::PathBuf;

use image::DynamicImage;
use serde::Serialize;

use crate::error::Result;

/// What a request hands to the engine.
///
/// Paths are passed through untouched; the engine owns reading them, so a
/// missing file surfaces as an engine failure.
#[derive(Debug, Clone)]
pub enum OcrInput {
    Path(PathBuf),
    Image(DynamicImage),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Corner points of a text line, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        let right = left + width;
        let bottom = top + height;
        Quad([
            Point { x: left, y: top },
            Point { x: right, y: top },
            Point {
                x: right,
                y: bottom,
            },
            Point { x: left, y: bottom },
        ])
    }
}

/// One line as recognized by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionLine {
    pub geometry: Quad,
    pub text: String,
    pub confidence: f32,
}

/// A page is `None` when the engine found nothing on it; a line entry is
/// `None` when the engine produced a malformed or empty entry.
pub type OcrPage = Option<Vec<Option<RecognitionLine>>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OcrOutput {
    pub pages: Vec<OcrPage>,
}

impl OcrOutput {
    pub fn single_page(lines: Vec<Option<RecognitionLine>>) -> Self {
        if lines.is_empty() {
            Self { pages: vec![None] }
        } else {
            Self {
                pages: vec![Some(lines)],
            }
        }
    }
}

/// A text detection + recognition pipeline.
///
/// Calls are blocking; callers run them on the blocking pool. Implementations
/// that wrap a non-reentrant native handle must serialize internally.
pub trait OcrEngine: Send + Sync {
    /// Short identifier used in logs and the health report.
    fn name(&self) -> &'static str;

    fn recognize(&self, input: OcrInput) -> Result<OcrOutput>;
}
