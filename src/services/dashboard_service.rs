use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::charts::build_charts;
use crate::config::Config;
use crate::data_provider::MockDataProvider;
use crate::errors::{DashboardError, FetchError, Result};
use crate::models::chart::ChartSpec;
use crate::models::quote::RawQuote;
use crate::models::stock::{FieldGroup, StockRecord, UNAVAILABLE_LABEL};
use crate::models::ticker::Ticker;
use crate::normalizer::{keys, Normalizer};
use crate::resolver::{InputResolver, OpenRouterLookup};
use crate::scrapers::{FinvizScraper, OfflineScraper, QuoteScraper};

/// Tickers used by the connectivity probe.
pub const PROBE_TICKERS: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "TSLA", "AMZN"];

/// Everything a presenter needs for one ticker.
///
/// `raw` is the provider's field map as fetched, `None` when the whole record
/// came from mock data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub ticker: Ticker,
    pub record: StockRecord,
    pub charts: [ChartSpec; 4],
    pub raw: Option<RawQuote>,
}

impl Dashboard {
    /// Plotly figures in chart order.
    pub fn figures(&self) -> Vec<Value> {
        self.charts.iter().map(ChartSpec::to_plotly).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Success { company: String },
    Error { kind: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub ticker: String,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

/// Runs resolve, fetch, normalize and chart building for one input.
pub struct DashboardService {
    config: Config,
    resolver: InputResolver,
    scraper: Arc<dyn QuoteScraper>,
    normalizer: Normalizer,
}

impl DashboardService {
    pub fn new(
        config: Config,
        resolver: InputResolver,
        scraper: Arc<dyn QuoteScraper>,
        mock: Arc<MockDataProvider>,
    ) -> Self {
        Self {
            config,
            resolver,
            scraper,
            normalizer: Normalizer::new(mock),
        }
    }

    /// Wire up the Finviz (or offline) scraper and the optional name lookup.
    pub fn from_config(config: Config) -> Result<Self> {
        let scraper: Arc<dyn QuoteScraper> = if config.offline {
            info!("Offline mode: all dashboards use mock data");
            Arc::new(OfflineScraper::new())
        } else {
            Arc::new(FinvizScraper::new(&config)?)
        };

        let mut resolver = InputResolver::new();
        if let Some(lookup) = OpenRouterLookup::from_config(&config)? {
            resolver = resolver.with_lookup(Arc::new(lookup));
        }
        if resolver.has_lookup() {
            info!("Ticker lookup enabled with model {}", config.openrouter_model);
        } else {
            debug!("Ticker lookup disabled; only known names and symbols resolve");
        }

        Ok(Self::new(config, resolver, scraper, Arc::new(MockDataProvider::new())))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scraper_name(&self) -> &'static str {
        self.scraper.name()
    }

    pub async fn resolve(&self, input: &str) -> Result<Ticker> {
        self.resolver.resolve_with_lookup(input).await
    }

    pub async fn dashboard_for_input(&self, input: &str) -> Result<Dashboard> {
        let ticker = self.resolve(input).await.map_err(|e| {
            error!("{}", e);
            e
        })?;
        self.dashboard_for_ticker(&ticker).await
    }

    /// Only a missing symbol is an error; any other fetch failure renders mock data.
    pub async fn dashboard_for_ticker(&self, ticker: &Ticker) -> Result<Dashboard> {
        let raw = match self.scraper.fetch(ticker).await {
            Ok(raw) => Some(raw),
            Err(e) if e.is_terminal() => {
                error!("{}", e);
                return Err(DashboardError::Fetch(e));
            }
            Err(e) => {
                warn!("{} fetch failed for {}, using mock data: {}", self.scraper.name(), ticker, e);
                None
            }
        };

        let normalized = self.normalizer.normalize_with_report(ticker, raw.as_ref());
        if raw.is_some() && !normalized.is_fully_live() {
            info!(
                "{}: {} of {} field groups from mock data",
                ticker,
                normalized.fallback_groups.len(),
                FieldGroup::ALL.len()
            );
        }

        let charts = build_charts(&normalized.record);
        Ok(Dashboard {
            ticker: ticker.clone(),
            record: normalized.record,
            charts,
            raw,
        })
    }

    /// Fetch each ticker once and report the company name or the error.
    pub async fn probe(&self, tickers: &[&str]) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(tickers.len());
        for symbol in tickers {
            let outcome = match Ticker::parse(symbol) {
                Ok(ticker) => match self.scraper.fetch(&ticker).await {
                    Ok(raw) => ProbeOutcome::Success {
                        company: raw
                            .text(keys::COMPANY)
                            .unwrap_or_else(|| UNAVAILABLE_LABEL.to_string()),
                    },
                    Err(e) => fetch_failure(&e),
                },
                Err(e) => ProbeOutcome::Error {
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                },
            };
            results.push(ProbeResult {
                ticker: symbol.to_string(),
                outcome,
            });
        }
        results
    }
}

fn fetch_failure(e: &FetchError) -> ProbeOutcome {
    ProbeOutcome::Error {
        kind: e.kind().to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_service() -> DashboardService {
        DashboardService::from_config(Config::new().with_offline(true)).unwrap()
    }

    #[tokio::test]
    async fn offline_renders_mock_dashboard() {
        let service = offline_service();
        let dashboard = service.dashboard_for_input("Microsoft").await.unwrap();

        assert_eq!(dashboard.ticker.as_str(), "MSFT");
        assert_eq!(dashboard.record, MockDataProvider::new().record_for(&dashboard.ticker));
        assert_eq!(dashboard.figures().len(), 4);
        assert!(dashboard.raw.is_none());
    }

    #[tokio::test]
    async fn unresolved_input_is_an_error() {
        let err = offline_service()
            .dashboard_for_input("NotARealCompanyXYZ")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unresolved_input");
    }

    #[tokio::test]
    async fn probe_reports_each_ticker() {
        let results = offline_service().probe(&PROBE_TICKERS).await;
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| matches!(
            &r.outcome,
            ProbeOutcome::Error { kind, .. } if kind == "unavailable"
        )));
    }

    #[test]
    fn probe_result_serializes_flat() {
        let result = ProbeResult {
            ticker: "AAPL".to_string(),
            outcome: ProbeOutcome::Success { company: "Apple Inc".to_string() },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["company"], "Apple Inc");
        assert_eq!(json["ticker"], "AAPL");
    }
}
