use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::quote::RawQuote;
use crate::models::ticker::Ticker;

/// Source of raw quote fields for a single ticker.
#[async_trait]
pub trait QuoteScraper: Send + Sync {
    /// Short provider name used in log lines
    fn name(&self) -> &'static str;

    /// Fetch the provider's field map for `ticker`.
    /// One attempt per call, no retries.
    async fn fetch(&self, ticker: &Ticker) -> std::result::Result<RawQuote, FetchError>;
}
