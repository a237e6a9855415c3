use std::any::Any;
use std::borrow::Cow;
use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};

use image::{DynamicImage, ImageFormat};
use leptess::{LepTess, Variable};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::engine::{OcrEngine, OcrInput, OcrOutput, Quad, RecognitionLine};
use crate::config::OcrConfig;
use crate::error::{OcrApiError, Result};

/// Automatic page segmentation with orientation and script detection.
const PSM_AUTO_OSD: &str = "1";
/// Fully automatic page segmentation, no orientation detection.
const PSM_AUTO: &str = "3";

const TSV_LEVEL_LINE: u8 = 4;
const TSV_LEVEL_WORD: u8 = 5;

/// Maps the short language codes accepted by `OCR_LANGUAGE` onto Tesseract
/// traineddata names. Unknown codes pass through, so native names such as
/// `deu` or `eng+fra` work as-is.
pub fn tesseract_language(code: &str) -> String {
    let code = code.trim();
    let mapped = match code {
        "ch" => "chi_sim+eng",
        "chinese_cht" => "chi_tra+eng",
        "en" => "eng",
        "japan" => "jpn",
        "korean" => "kor",
        "french" | "fr" => "fra",
        "german" | "de" => "deu",
        "es" => "spa",
        "it" => "ita",
        "pt" => "por",
        "ru" => "rus",
        "ar" => "ara",
        other => other,
    };
    mapped.to_string()
}

/// Tesseract-backed engine.
///
/// A `LepTess` handle is not reentrant, so every call takes the mutex for the
/// whole set-image/recognize cycle. The bindings unwrap a NULL result when
/// Tesseract refuses a page (e.g. a side longer than 32767 px); that panic is
/// caught and reported as an error for that request alone, and the
/// non-poisoning mutex keeps the handle usable for the next one.
pub struct TesseractEngine {
    tesseract: Mutex<LepTess>,
    language: String,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let language = tesseract_language(&config.language);

        let mut tesseract = LepTess::new(config.tessdata_path.as_deref(), &language)
            .map_err(|e| {
                OcrApiError::OcrUnavailable(format!(
                    "Tesseract failed to load language '{language}': {e}"
                ))
            })?;

        let mode = if config.angle_classification {
            PSM_AUTO_OSD
        } else {
            PSM_AUTO
        };
        tesseract
            .set_variable(Variable::TesseditPagesegMode, mode)
            .map_err(|e| {
                OcrApiError::OcrUnavailable(format!("Failed to set page segmentation mode: {e:?}"))
            })?;

        Ok(Self {
            tesseract: Mutex::new(tesseract),
            language,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, input: OcrInput) -> Result<OcrOutput> {
        let encoded = match input {
            OcrInput::Path(path) => std::fs::read(&path)?,
            OcrInput::Image(image) => encode_png(&image)?,
        };

        // Runs on the blocking pool, never inside the async runtime.
        let mut tesseract = self.tesseract.blocking_lock();
        let tsv = catch_engine_panic(|| {
            tesseract
                .set_image_from_mem(&encoded)
                .map_err(|e| OcrApiError::Ocr(format!("Failed to set image: {e}")))?;
            tesseract
                .get_tsv_text(0)
                .map_err(|e| OcrApiError::Ocr(format!("Failed to extract text: {e}")))
        })?;

        let lines = lines_from_tsv(&tsv);
        debug!(lines = lines.len(), "Tesseract recognition finished");

        Ok(OcrOutput::single_page(lines))
    }
}

/// Runs `call`, turning a panic raised inside it into `OcrApiError::Ocr`.
fn catch_engine_panic<T>(call: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        let detail = panic_detail(payload.as_ref());
        warn!(panic = %detail, "Tesseract panicked during recognition");
        Err(OcrApiError::Ocr(format!("Recognition failed: {detail}")))
    })
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    }
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    // The PNG encoder has no float color types.
    let image = match image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8()))
        }
        other => Cow::Borrowed(other),
    };

    let mut output = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| OcrApiError::Ocr(format!("Failed to encode image: {e}")))?;
    Ok(output)
}

struct TsvRow<'a> {
    level: u8,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    conf: f32,
    text: &'a str,
}

/// Parses one row of `level page block par line word left top width height conf text`.
/// The header row and anything malformed yield `None`.
fn parse_tsv_row(raw: &str) -> Option<TsvRow<'_>> {
    let fields: Vec<&str> = raw.splitn(12, '\t').collect();
    if fields.len() < 11 {
        return None;
    }

    Some(TsvRow {
        level: fields[0].trim().parse().ok()?,
        left: fields[6].trim().parse().ok()?,
        top: fields[7].trim().parse().ok()?,
        width: fields[8].trim().parse().ok()?,
        height: fields[9].trim().parse().ok()?,
        conf: fields[10].trim().parse().ok()?,
        text: fields.get(11).copied().unwrap_or(""),
    })
}

struct LineBuilder {
    geometry: Quad,
    words: Vec<String>,
    confidences: Vec<f32>,
}

impl LineBuilder {
    fn new(row: &TsvRow<'_>) -> Self {
        Self {
            geometry: Quad::from_rect(row.left, row.top, row.width, row.height),
            words: Vec::new(),
            confidences: Vec::new(),
        }
    }

    fn push_word(&mut self, row: &TsvRow<'_>) {
        let word = row.text.trim();
        if word.is_empty() {
            return;
        }
        self.words.push(word.to_string());
        if row.conf >= 0.0 {
            self.confidences.push(row.conf);
        }
    }

    fn finish(self) -> Option<RecognitionLine> {
        if self.words.is_empty() {
            return None;
        }

        let confidence = if self.confidences.is_empty() {
            0.0
        } else {
            self.confidences.iter().sum::<f32>() / self.confidences.len() as f32 / 100.0
        };

        Some(RecognitionLine {
            geometry: self.geometry,
            text: self.words.join(" "),
            confidence,
        })
    }
}

/// Groups Tesseract's word rows under their line rows, in reading order.
/// Lines without any recognized word become empty (`None`) entries.
fn lines_from_tsv(tsv: &str) -> Vec<Option<RecognitionLine>> {
    let mut lines = Vec::new();
    let mut current: Option<LineBuilder> = None;

    for row in tsv.lines().filter_map(parse_tsv_row) {
        match row.level {
            TSV_LEVEL_LINE => {
                if let Some(done) = current.take() {
                    lines.push(done.finish());
                }
                current = Some(LineBuilder::new(&row));
            }
            TSV_LEVEL_WORD => {
                if let Some(builder) = current.as_mut() {
                    builder.push_word(&row);
                }
            }
            _ => {}
        }
    }

    if let Some(done) = current {
        lines.push(done.finish());
    }

    lines
}
