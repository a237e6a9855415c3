use serde::Deserialize;
use std::env;

const DEFAULT_BODY_LIMIT: usize = 20 * 1024 * 1024;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(val) if !val.trim().is_empty() => Some(val.trim().to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for request bodies (JSON payloads and multipart uploads).
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Language code selected at start, e.g. `ch`, `en` or a raw Tesseract
    /// name such as `deu+eng`.
    pub language: String,
    pub tessdata_path: Option<String>,
    pub timeout_secs: u64,
    pub angle_classification: bool,
}

/// Limits applied to the outbound fetch behind `predict-by-url`.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_bytes: u64,
    pub max_redirects: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "ch".to_string(),
            tessdata_path: None,
            timeout_secs: 60,
            angle_classification: true,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_bytes: DEFAULT_BODY_LIMIT as u64,
            max_redirects: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let ocr_defaults = OcrConfig::default();
        let fetch_defaults = FetchConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("OCR_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("OCR_API_PORT", 8000),
                max_upload_bytes: parse_env_or("OCR_MAX_UPLOAD_BYTES", DEFAULT_BODY_LIMIT),
            },
            ocr: OcrConfig {
                language: parse_env_opt("OCR_LANGUAGE").unwrap_or(ocr_defaults.language),
                tessdata_path: parse_env_opt("OCR_TESSDATA_PATH"),
                timeout_secs: parse_env_or("OCR_TIMEOUT_SECS", ocr_defaults.timeout_secs),
                angle_classification: parse_env_or(
                    "OCR_ANGLE_CLASSIFICATION",
                    ocr_defaults.angle_classification,
                ),
            },
            fetch: FetchConfig {
                timeout_secs: parse_env_or("FETCH_TIMEOUT_SECS", fetch_defaults.timeout_secs),
                max_bytes: parse_env_or("FETCH_MAX_BYTES", fetch_defaults.max_bytes),
                max_redirects: parse_env_or("FETCH_MAX_REDIRECTS", fetch_defaults.max_redirects),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
