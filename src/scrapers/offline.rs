use async_trait::async_trait;
use log::debug;

use crate::errors::FetchError;
use crate::models::quote::RawQuote;
use crate::models::ticker::Ticker;
use crate::scrapers::base::QuoteScraper;

/// Scraper that never reaches the network, so every render uses mock data.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineScraper;

impl OfflineScraper {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuoteScraper for OfflineScraper {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn fetch(&self, ticker: &Ticker) -> std::result::Result<RawQuote, FetchError> {
        debug!("offline mode, skipping fetch for {}", ticker);
        Err(FetchError::Unavailable("offline mode".to_string()))
    }
}
