//! Request input normalization.
//!
//! Every channel ends up as an [`OcrInput`](crate::ocr::OcrInput): paths are
//! passed through, everything else is decoded into an in-memory image here.

mod fetch;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageReader};

use crate::error::{OcrApiError, Result};

pub use fetch::UrlFetcher;

pub const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];
pub const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Upload names must end with one of these (case-sensitive).
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".jpg", ".png"];

/// True when the bytes open with a JPEG or PNG signature.
pub fn has_image_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(JPEG_SIGNATURE) || bytes.starts_with(PNG_SIGNATURE)
}

pub fn accepts_file_name(file_name: &str) -> bool {
    ACCEPTED_EXTENSIONS
        .iter()
        .any(|extension| file_name.ends_with(extension))
}

/// Decodes raw image bytes, guessing the format from their content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Decodes a base64 payload (optionally a `data:` URL) into an image.
/// Line-wrapped (MIME-style) payloads are accepted.
pub fn decode_base64(payload: &str) -> Result<DynamicImage> {
    let encoded: String = strip_data_url_prefix(payload.trim())
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(encoded)?;
    decode_image(&bytes)
}

fn strip_data_url_prefix(payload: &str) -> &str {
    if !payload.starts_with("data:") {
        return payload;
    }
    match payload.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => payload,
    }
}

/// Rejects bytes that are not JPEG or PNG, reporting what they look like instead.
pub(crate) fn ensure_image_signature(bytes: &[u8], source: &str) -> Result<()> {
    if has_image_signature(bytes) {
        return Ok(());
    }

    let detected = infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("unknown");
    tracing::warn!(
        source = %source,
        detected = %detected,
        len = bytes.len(),
        "Rejected content without a JPEG or PNG signature"
    );
    Err(OcrApiError::UnsupportedImage)
}
