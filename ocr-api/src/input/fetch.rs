use std::time::Duration;

use futures::StreamExt;
use image::DynamicImage;
use reqwest::{redirect, Client};
use url::Url;

use super::{decode_image, ensure_image_signature};
use crate::config::FetchConfig;
use crate::error::{OcrApiError, Result};

/// Downloads caller-supplied image URLs within fixed limits.
#[derive(Clone, Debug)]
pub struct UrlFetcher {
    client: Client,
    max_bytes: u64,
}

impl UrlFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| OcrApiError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    /// Fetches the body of `raw_url`. The upstream status and content type
    /// are not consulted; callers sniff the bytes themselves.
    pub async fn fetch(&self, raw_url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(raw_url.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OcrApiError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let response = self.client.get(url).send().await?;

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(OcrApiError::ResponseTooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(OcrApiError::ResponseTooLarge {
                    limit: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    /// Fetches `raw_url` and decodes it, accepting only JPEG and PNG bodies.
    pub async fn fetch_image(&self, raw_url: &str) -> Result<DynamicImage> {
        let bytes = self.fetch(raw_url).await?;
        ensure_image_signature(&bytes, raw_url)?;
        decode_image(&bytes)
    }
}
