//! Turns a partial provider quote into a complete [`StockRecord`].
//!
//! Each field group is extracted on its own; a group whose keys are missing
//! or fail to coerce is replaced by the mock group, leaving the others intact.

use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::data_provider::MockDataProvider;
use crate::models::quote::RawQuote;
use crate::models::stock::{
    AnalystRating, Dividend, FieldGroup, Identity, Metric, Performance, Profile, Ratings,
    Recommendation, Risk, SeriesPoint, Signals, StockRecord, TradingSignal, Valuation,
    UNAVAILABLE_LABEL,
};
use crate::models::ticker::Ticker;
use crate::util;

pub mod keys {
    pub const COMPANY: &str = "Company";
    pub const SECTOR: &str = "Sector";
    pub const INDUSTRY: &str = "Industry";
    pub const COUNTRY: &str = "Country";
    pub const MARKET_CAP: &str = "Market Cap";
    pub const DESCRIPTION: &str = "Description";
    pub const PRICE: &str = "Price";
    pub const RANGE_52W: &str = "52W Range";
    pub const HIGH_52W: &str = "52W High";
    pub const LOW_52W: &str = "52W Low";
    pub const PRICE_HISTORY: &str = "Price History";
    pub const VOLUME: &str = "Volume";
    pub const AVG_VOLUME: &str = "Avg Volume";
    pub const VOLUME_HISTORY: &str = "Volume History";
    pub const PE: &str = "P/E";
    pub const PB: &str = "P/B";
    pub const PS: &str = "P/S";
    pub const PEG: &str = "PEG";
    pub const ROE: &str = "ROE";
    pub const ROI: [&str; 2] = ["ROI", "ROIC"];
    pub const ROA: &str = "ROA";
    pub const PROFIT_MARGIN: &str = "Profit Margin";
    pub const SIGNAL: &str = "Signal";
    pub const RECOM: &str = "Recom";
    pub const RECOMMENDATION: &str = "Recommendation";
    pub const TARGET_PRICE: &str = "Target Price";
    pub const DIVIDEND: &str = "Dividend";
    pub const DIVIDEND_YIELD: &str = "Dividend %";
    pub const DIVIDEND_COMPOSITE: [&str; 2] = ["Dividend TTM", "Dividend Est."];
    pub const PAYOUT: [&str; 2] = ["Payout Ratio", "Payout"];
    pub const BETA: &str = "Beta";
    pub const VOLATILITY: &str = "Volatility";
    pub const RATINGS: &str = "Ratings";
}

/// Record plus the groups that came from mock data.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: StockRecord,
    pub fallback_groups: Vec<FieldGroup>,
}

impl Normalized {
    pub fn is_fully_live(&self) -> bool {
        self.fallback_groups.is_empty()
    }
}

pub struct Normalizer {
    mock: Arc<MockDataProvider>,
}

impl Normalizer {
    pub fn new(mock: Arc<MockDataProvider>) -> Self {
        Self { mock }
    }

    pub fn mock(&self) -> &MockDataProvider {
        &self.mock
    }

    /// Never fails; anything the quote cannot supply comes from the mock table.
    pub fn normalize(&self, ticker: &Ticker, raw: Option<&RawQuote>) -> StockRecord {
        self.normalize_with_report(ticker, raw).record
    }

    pub fn normalize_with_report(&self, ticker: &Ticker, raw: Option<&RawQuote>) -> Normalized {
        let mock = &self.mock;
        let mut fallback_groups = Vec::new();
        let mut track = |group: FieldGroup, live: bool| {
            if !live {
                debug!("{}: substituting mock {} group", ticker, group);
                fallback_groups.push(group);
            }
        };

        let identity = raw.and_then(|q| extract_identity(q, ticker));
        track(FieldGroup::Identity, identity.is_some());
        let profile = raw.and_then(extract_profile);
        track(FieldGroup::Profile, profile.is_some());

        let mut pricing = mock.pricing();
        let live_pricing = raw.and_then(extract_pricing);
        track(FieldGroup::Pricing, live_pricing.is_some());
        if let Some((current, high, low)) = live_pricing {
            pricing.current = current;
            pricing.high_52w = high;
            pricing.low_52w = low;
        }
        let price_history = raw.and_then(|q| extract_series(q, keys::PRICE_HISTORY));
        track(FieldGroup::PriceHistory, price_history.is_some());
        if let Some(history) = price_history {
            pricing.history = history;
        }

        let mut volume = mock.volume();
        let live_volume = raw.and_then(extract_volume);
        track(FieldGroup::Volume, live_volume.is_some());
        if let Some((current, average)) = live_volume {
            volume.current = current;
            volume.average = average;
        }
        let volume_history = raw.and_then(|q| extract_series(q, keys::VOLUME_HISTORY));
        track(FieldGroup::VolumeHistory, volume_history.is_some());
        if let Some(history) = volume_history {
            volume.history = history;
        }

        let valuation = raw.and_then(extract_valuation);
        track(FieldGroup::Valuation, valuation.is_some());
        let performance = raw.and_then(extract_performance);
        track(FieldGroup::Performance, performance.is_some());
        let signals = raw.and_then(extract_signals);
        track(FieldGroup::Signals, signals.is_some());
        let dividend = raw.and_then(extract_dividend);
        track(FieldGroup::Dividend, dividend.is_some());
        let risk = raw.and_then(extract_risk);
        track(FieldGroup::Risk, risk.is_some());
        let ratings = raw.and_then(extract_ratings);
        track(FieldGroup::Ratings, ratings.is_some());

        Normalized {
            record: StockRecord {
                identity: identity.unwrap_or_else(|| mock.identity(ticker)),
                profile: profile.unwrap_or_else(|| mock.profile()),
                pricing,
                volume,
                valuation: valuation.unwrap_or_else(|| mock.valuation()),
                performance: performance.unwrap_or_else(|| mock.performance()),
                signals: signals.unwrap_or_else(|| mock.signals()),
                dividend: dividend.unwrap_or_else(|| mock.dividend()),
                risk: risk.unwrap_or_else(|| mock.risk()),
                ratings: ratings.unwrap_or_else(|| mock.ratings()),
            },
            fallback_groups,
        }
    }
}

fn non_empty_text(raw: &RawQuote, key: &str) -> Option<String> {
    raw.text(key)
        .filter(|text| !util::is_unavailable_marker(text))
}

fn metric(raw: &RawQuote, key: &str) -> Option<Metric> {
    util::parse_metric(&raw.text(key)?)
}

fn first_metric(raw: &RawQuote, keys: &[&str]) -> Option<Metric> {
    util::parse_metric(&raw.first_text(keys)?)
}

fn extract_identity(raw: &RawQuote, ticker: &Ticker) -> Option<Identity> {
    Some(Identity {
        ticker: ticker.clone(),
        company: non_empty_text(raw, keys::COMPANY)?,
        sector: non_empty_text(raw, keys::SECTOR)?,
        industry: non_empty_text(raw, keys::INDUSTRY)?,
    })
}

/// Country and market cap decide the group; a missing description reads `N/A`.
fn extract_profile(raw: &RawQuote) -> Option<Profile> {
    Some(Profile {
        country: non_empty_text(raw, keys::COUNTRY)?,
        market_cap: non_empty_text(raw, keys::MARKET_CAP)?,
        description: non_empty_text(raw, keys::DESCRIPTION)
            .unwrap_or_else(|| UNAVAILABLE_LABEL.to_string()),
    })
}

/// Current price with the 52-week high and low.
fn extract_pricing(raw: &RawQuote) -> Option<(f64, f64, f64)> {
    let price = util::parse_number(&raw.text(keys::PRICE)?)?;
    if let Some((low, high)) = raw.text(keys::RANGE_52W).as_deref().and_then(util::parse_range) {
        return Some((price, high, low));
    }
    let high = level_52w(&raw.text(keys::HIGH_52W)?, price)?;
    let low = level_52w(&raw.text(keys::LOW_52W)?, price)?;
    Some((price, high, low))
}

/// A 52-week level is either a price or the current price's percent distance from it.
fn level_52w(text: &str, price: f64) -> Option<f64> {
    let value = util::parse_number(text)?;
    if !text.trim_end().ends_with('%') {
        return Some(value);
    }
    let factor = 1.0 + value / 100.0;
    (factor > 0.0).then(|| price / factor)
}

fn extract_series(raw: &RawQuote, key: &str) -> Option<Vec<SeriesPoint>> {
    util::parse_series(raw.get(key)?)
}

fn extract_volume(raw: &RawQuote) -> Option<(u64, u64)> {
    Some((
        util::parse_count(&raw.text(keys::VOLUME)?)?,
        util::parse_count(&raw.text(keys::AVG_VOLUME)?)?,
    ))
}

fn extract_valuation(raw: &RawQuote) -> Option<Valuation> {
    Some(Valuation {
        pe: metric(raw, keys::PE)?,
        pb: metric(raw, keys::PB)?,
        ps: metric(raw, keys::PS)?,
        peg: metric(raw, keys::PEG)?,
    })
}

fn extract_performance(raw: &RawQuote) -> Option<Performance> {
    Some(Performance {
        roe: metric(raw, keys::ROE)?,
        roi: first_metric(raw, &keys::ROI)?,
        roa: metric(raw, keys::ROA)?,
        profit_margin: metric(raw, keys::PROFIT_MARGIN)?,
    })
}

fn extract_signals(raw: &RawQuote) -> Option<Signals> {
    Some(Signals {
        signal: signal(raw.get(keys::SIGNAL)),
        recommendation: recommendation(raw)?,
        target_price: metric(raw, keys::TARGET_PRICE)?,
    })
}

/// `Recom` score first, then the textual consensus. An explicit `-` in
/// either with nothing better reads as unrated.
fn recommendation(raw: &RawQuote) -> Option<Recommendation> {
    let score = raw.text(keys::RECOM);
    let text = raw.text(keys::RECOMMENDATION);

    score
        .as_deref()
        .and_then(util::parse_number)
        .and_then(Recommendation::from_score)
        .or_else(|| text.as_deref().and_then(Recommendation::from_text))
        .or_else(|| {
            [&score, &text]
                .into_iter()
                .flatten()
                .any(|t| util::is_unavailable_marker(t))
                .then_some(Recommendation::Unrated)
        })
}

/// Text or list of texts; the first recognised entry wins.
fn signal(value: Option<&Value>) -> TradingSignal {
    match value {
        Some(Value::String(text)) => TradingSignal::from_text(text),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(TradingSignal::from_text)
            .find(|s| *s != TradingSignal::Neutral)
            .unwrap_or(TradingSignal::Neutral),
        _ => TradingSignal::Neutral,
    }
}

fn extract_dividend(raw: &RawQuote) -> Option<Dividend> {
    let payout_ratio = first_metric(raw, &keys::PAYOUT)?;
    if let (Some(amount), Some(yield_pct)) = (raw.text(keys::DIVIDEND), raw.text(keys::DIVIDEND_YIELD)) {
        return Some(Dividend {
            amount: util::parse_metric(&amount)?,
            yield_pct: util::parse_metric(&yield_pct)?,
            payout_ratio,
        });
    }

    let composite = raw.first_text(&keys::DIVIDEND_COMPOSITE)?;
    if util::is_unavailable_marker(&composite) {
        return Some(Dividend {
            amount: Metric::Unavailable,
            yield_pct: Metric::Unavailable,
            payout_ratio,
        });
    }
    Some(Dividend {
        amount: util::parse_leading_metric(&composite)?,
        yield_pct: util::parse_paren_percent(&composite).map_or(Metric::Unavailable, Metric::Value),
        payout_ratio,
    })
}

fn extract_risk(raw: &RawQuote) -> Option<Risk> {
    let (volatility_week, volatility_month) = util::parse_metric_pair(&raw.text(keys::VOLATILITY)?)?;
    Some(Risk {
        beta: metric(raw, keys::BETA)?,
        volatility_week,
        volatility_month,
    })
}

/// Rating history as rows, or a bare summary word. An explicit `-` is an
/// empty history.
fn extract_ratings(raw: &RawQuote) -> Option<Ratings> {
    let value = raw.get(keys::RATINGS)?;
    match value {
        Value::Array(_) => serde_json::from_value::<Vec<AnalystRating>>(value.clone())
            .ok()
            .map(Ratings::from_entries),
        Value::String(text) if util::is_unavailable_marker(text) => Some(Ratings::from_entries(Vec::new())),
        Value::String(text) => Some(Ratings {
            summary: text.trim().to_string(),
            entries: Vec::new(),
        }),
        _ => None,
    }
}
