#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use finviz_dashboard::config::Config;
use finviz_dashboard::scrapers::QuoteScraper;
use finviz_dashboard::{
    DashboardService, FetchError, InputResolver, MockDataProvider, RawQuote, Ticker,
};

/// Scraper returning a canned answer and counting calls.
pub struct StubScraper {
    answer: Result<RawQuote, FetchError>,
    calls: AtomicUsize,
}

impl StubScraper {
    pub fn quote(quote: RawQuote) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(quote),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(err: FetchError) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(err),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteScraper for StubScraper {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch(&self, _ticker: &Ticker) -> Result<RawQuote, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

pub fn service_with(scraper: Arc<StubScraper>) -> DashboardService {
    DashboardService::new(
        Config::new(),
        InputResolver::new(),
        scraper,
        Arc::new(MockDataProvider::new()),
    )
}

/// Every key the normalizer reads, with live-looking values distinct from the mock table.
pub fn full_quote(company: &str) -> RawQuote {
    RawQuote::new()
        .with("Company", company)
        .with("Sector", "Consumer Cyclical")
        .with("Industry", "Auto Manufacturers")
        .with("Country", "USA")
        .with("Market Cap", "789.01B")
        .with("Description", "Designs and sells electric vehicles.")
        .with("Price", "$248.50")
        .with("52W Range", "138.80 - 299.29")
        .with(
            "Price History",
            json!([
                ["2024-01-02", 248.42],
                ["2024-02-01", 188.86],
                ["2024-03-01", 202.64],
                ["2024-04-01", 175.22],
                ["2024-05-01", 179.99],
                ["2024-06-03", 176.29],
            ]),
        )
        .with("Volume", "98,765,432")
        .with("Avg Volume", "101.25M")
        .with(
            "Volume History",
            json!([
                { "date": "2024-04-01", "value": "77.2M" },
                { "date": "2024-05-01", "value": "92.1M" },
            ]),
        )
        .with("P/E", "68.12")
        .with("P/B", "12.04")
        .with("P/S", "8.13")
        .with("PEG", "-")
        .with("ROE", "22.01%")
        .with("ROI", "13.34%")
        .with("ROA", "13.12%")
        .with("Profit Margin", "15.50%")
        .with("Signal", "Sell")
        .with("Recom", "2.80")
        .with("Target Price", "210.45")
        .with("Dividend TTM", "-")
        .with("Payout", "0.00%")
        .with("Beta", "2.31")
        .with("Volatility", "3.85% 4.12%")
        .with(
            "Ratings",
            json!([
                { "date": "2024-10-23", "action": "Downgrade", "firm": "Baird",
                  "rating": "Outperform → Neutral", "price_target": "$280 → $210" },
            ]),
        )
}

pub const DIVIDEND_KEYS: [&str; 6] = [
    "Dividend",
    "Dividend %",
    "Dividend TTM",
    "Dividend Est.",
    "Payout Ratio",
    "Payout",
];
