//! End-to-end behaviour of the resolve, fetch, normalize and chart pipeline.

mod common;

use std::sync::Arc;

use finviz_dashboard::models::chart::ChartKind;
use finviz_dashboard::models::stock::{FieldGroup, Metric, Recommendation, TradingSignal};
use finviz_dashboard::{build_charts, FetchError, InputResolver, MockDataProvider, Normalizer, RawQuote, Ticker};

use common::{full_quote, service_with, StubScraper, DIVIDEND_KEYS};

fn normalizer() -> Normalizer {
    Normalizer::new(Arc::new(MockDataProvider::new()))
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn ticker_with_full_quote_renders_live_dashboard() {
    // Given: the provider knows everything about AAPL
    let scraper = StubScraper::quote(full_quote("Apple Inc"));
    let service = service_with(scraper.clone());

    // When: the user asks for "AAPL"
    let dashboard = service.dashboard_for_input("AAPL").await.expect("live dashboard");

    // Then: identity and metrics come from the quote
    let record = &dashboard.record;
    assert_eq!(dashboard.ticker.as_str(), "AAPL");
    assert_eq!(record.identity.company, "Apple Inc");
    assert_eq!(record.identity.sector, "Consumer Cyclical");
    assert_eq!(record.pricing.current, 248.50);
    assert_eq!(record.pricing.high_52w, 299.29);
    assert_eq!(record.volume.average, 101_250_000);
    assert_eq!(record.valuation.peg, Metric::Unavailable);
    assert_eq!(record.signals.signal, TradingSignal::Sell);
    assert_eq!(record.signals.recommendation, Recommendation::Hold);
    assert_eq!(record.risk.volatility_month, Metric::Value(4.12));
    assert_eq!(record.ratings.summary, "Negative");
    assert_eq!(record.ratings.entries[0].firm, "Baird");

    // And: four charts are built, the first from the live series
    assert_eq!(dashboard.charts.len(), 4);
    assert_eq!(dashboard.charts[0].values.len(), 6);
    assert_eq!(dashboard.charts[0].values[0], 248.42);
    assert_eq!(dashboard.charts[1].categories, vec!["2024-04-01", "2024-05-01"]);
    assert_eq!(scraper.calls(), 1);
}

#[tokio::test]
async fn unknown_company_is_an_error_without_fetching() {
    let scraper = StubScraper::quote(full_quote("Apple Inc"));
    let service = service_with(scraper.clone());

    let err = service
        .dashboard_for_input("NotARealCompanyXYZ")
        .await
        .expect_err("input should not resolve");

    assert_eq!(err.kind(), "unresolved_input");
    assert_eq!(scraper.calls(), 0, "no fetch may be issued for unresolved input");
}

#[tokio::test]
async fn unavailable_provider_renders_full_mock_record() {
    let service = service_with(StubScraper::failing(FetchError::Unavailable("timeout".into())));

    let dashboard = service
        .dashboard_for_input("MSFT")
        .await
        .expect("fallback is not an error");

    let expected = MockDataProvider::new().record_for(&Ticker::parse("MSFT").unwrap());
    assert_eq!(dashboard.record, expected);
    assert_eq!(dashboard.charts, build_charts(&expected));
}

#[tokio::test]
async fn malformed_page_also_falls_back() {
    let service = service_with(StubScraper::failing(FetchError::Malformed("no table".into())));
    let dashboard = service.dashboard_for_input("GOOGL").await.unwrap();
    assert_eq!(dashboard.record.identity.company, "Sample Company (GOOGL)");
}

#[tokio::test]
async fn unknown_symbol_is_terminal() {
    let service = service_with(StubScraper::failing(FetchError::NotFound("ZZZZ".into())));
    let err = service.dashboard_for_input("ZZZZ").await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn missing_dividend_keys_only_replace_dividend() {
    // Given: a TSLA quote without any dividend field
    let mut quote = full_quote("Tesla, Inc.");
    for key in DIVIDEND_KEYS {
        quote.remove(key);
    }
    let service = service_with(StubScraper::quote(quote));

    // When
    let dashboard = service.dashboard_for_input("Tesla").await.unwrap();

    // Then: pricing and valuation stay live, dividend is the mock group
    let mock = MockDataProvider::new();
    assert_eq!(dashboard.ticker.as_str(), "TSLA");
    assert_eq!(dashboard.record.pricing.current, 248.50);
    assert_eq!(dashboard.record.valuation.pe, Metric::Value(68.12));
    assert_eq!(dashboard.record.dividend, mock.dividend());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn resolution_is_idempotent_for_accepted_inputs() {
    let resolver = InputResolver::new();
    for input in ["Apple", "microsoft", "TSLA", "nvda", "Alphabet", "brk.b", "X"] {
        let once = resolver.resolve(input).unwrap();
        assert_eq!(resolver.resolve(once.as_str()).unwrap(), once, "{input}");
    }
}

#[test]
fn absent_quote_normalizes_to_mock_record() {
    let ticker = Ticker::parse("AMZN").unwrap();
    let record = normalizer().normalize(&ticker, None);
    assert_eq!(record, MockDataProvider::new().record_for(&ticker));
}

#[test]
fn empty_quote_is_fully_populated_from_mock() {
    let ticker = Ticker::parse("AMZN").unwrap();
    let normalized = normalizer().normalize_with_report(&ticker, Some(&RawQuote::new()));
    assert_eq!(normalized.record, MockDataProvider::new().record_for(&ticker));
    assert_eq!(normalized.fallback_groups.len(), FieldGroup::ALL.len());
}

#[test]
fn garbage_values_never_panic_and_fall_back() {
    let ticker = Ticker::parse("AMZN").unwrap();
    let quote = RawQuote::new()
        .with("Price", "n/a")
        .with("Volume", "lots")
        .with("P/E", serde_json::json!({ "nested": true }))
        .with("Price History", "not a list")
        .with("Recom", "9.9")
        .with("Volatility", "1%");

    let normalized = normalizer().normalize_with_report(&ticker, Some(&quote));
    let mock = MockDataProvider::new();
    assert_eq!(normalized.record.pricing, mock.pricing());
    assert_eq!(normalized.record.volume, mock.volume());
    assert_eq!(normalized.record.valuation, mock.valuation());
    assert_eq!(normalized.record.signals, mock.signals());
    assert_eq!(normalized.record.risk, mock.risk());
}

#[test]
fn field_groups_are_independent_of_each_other_and_key_order() {
    let ticker = Ticker::parse("TSLA").unwrap();
    let valuation = [("P/E", "68.12"), ("P/B", "12.04"), ("P/S", "8.13"), ("PEG", "3.10")];

    let forward: RawQuote = valuation.into_iter().collect();
    let reverse: RawQuote = valuation.into_iter().rev().collect();

    for quote in [forward, reverse] {
        let normalized = normalizer().normalize_with_report(&ticker, Some(&quote));
        assert_eq!(normalized.record.valuation.pb, Metric::Value(12.04));
        assert_eq!(normalized.record.performance, MockDataProvider::new().performance());
        assert!(!normalized.fallback_groups.contains(&FieldGroup::Valuation));
        assert!(normalized.fallback_groups.contains(&FieldGroup::Performance));
    }
}

#[test]
fn charts_survive_empty_and_single_point_series() {
    let ticker = Ticker::parse("AAPL").unwrap();
    for history in [serde_json::json!([]), serde_json::json!([["2024-06-03", 176.29]])] {
        let quote = full_quote("Apple Inc")
            .with("Price History", history.clone())
            .with("Volume History", history);
        let record = normalizer().normalize(&ticker, Some(&quote));
        let charts = build_charts(&record);

        assert_eq!(charts[0].categories, vec!["Start", "Current"]);
        assert_eq!(charts[0].values, vec![248.50, 248.50]);
        assert_eq!(charts[1].values, vec![98_765_432.0, 98_765_432.0]);
        assert_eq!(charts[2].len(), 4);
        assert_eq!(charts[3].kind, ChartKind::Pie);
    }
}
