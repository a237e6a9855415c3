use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::input::UrlFetcher;
use crate::ocr::OcrProvider;

/// Long-lived services shared by every request. Built once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ocr: OcrProvider,
    pub fetcher: UrlFetcher,
}

impl AppState {
    pub fn new(config: Config, ocr: OcrProvider) -> Result<Self> {
        let fetcher = UrlFetcher::new(&config.fetch)?;

        Ok(Self {
            config: Arc::new(config),
            ocr,
            fetcher,
        })
    }
}
