//! HTTP front-end that exposes a pretrained OCR engine as a JSON web API.
//!
//! Images arrive by path, base64 payload, multipart upload or remote URL,
//! are normalized in [`input`], recognized through [`ocr`], and answered
//! with the envelope in [`api::response`].

pub mod api;
pub mod config;
pub mod error;
pub mod input;
pub mod ocr;
