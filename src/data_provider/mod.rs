use chrono::NaiveDate;

use crate::models::stock::{
    Dividend, Identity, Metric, Performance, Pricing, Profile, Ratings, Recommendation, Risk,
    SeriesPoint, Signals, StockRecord, TradingSignal, Valuation, Volume,
};
use crate::models::ticker::Ticker;

const MOCK_PRICES: [f64; 6] = [100.0, 105.0, 102.0, 110.0, 108.0, 115.0];
const MOCK_VOLUMES: [f64; 6] = [1_000_000.0, 1_200_000.0, 900_000.0, 1_500_000.0, 1_300_000.0, 1_100_000.0];

/// Static stand-in values substituted for any field group the provider did
/// not deliver.
///
/// Built once at start-up and shared read-only; every accessor returns an
/// owned copy so the normalizer can splice groups freely.
#[derive(Debug, Clone)]
pub struct MockDataProvider {
    profile: Profile,
    pricing: Pricing,
    volume: Volume,
    valuation: Valuation,
    performance: Performance,
    signals: Signals,
    dividend: Dividend,
    risk: Risk,
    ratings: Ratings,
}

impl MockDataProvider {
    pub fn new() -> Self {
        Self {
            profile: Profile {
                country: "USA".to_string(),
                market_cap: "$2.5T".to_string(),
                description: "Sample company description".to_string(),
            },
            pricing: Pricing {
                current: 150.25,
                high_52w: 175.50,
                low_52w: 120.00,
                history: monthly_series(&MOCK_PRICES),
            },
            volume: Volume {
                current: 45_231_100,
                average: 50_000_000,
                history: monthly_series(&MOCK_VOLUMES),
            },
            valuation: Valuation {
                pe: Metric::Value(25.5),
                pb: Metric::Value(8.2),
                ps: Metric::Value(6.1),
                peg: Metric::Value(1.8),
            },
            performance: Performance {
                roe: Metric::Value(32.5),
                roi: Metric::Value(28.3),
                roa: Metric::Value(18.7),
                profit_margin: Metric::Value(22.4),
            },
            signals: Signals {
                signal: TradingSignal::Buy,
                recommendation: Recommendation::Buy,
                target_price: Metric::Value(165.0),
            },
            dividend: Dividend {
                amount: Metric::Value(0.96),
                yield_pct: Metric::Value(2.5),
                payout_ratio: Metric::Value(25.0),
            },
            risk: Risk {
                beta: Metric::Value(1.25),
                volatility_week: Metric::Value(25.2),
                volatility_month: Metric::Value(25.2),
            },
            ratings: Ratings {
                summary: "Positive".to_string(),
                entries: Vec::new(),
            },
        }
    }

    /// Complete mock record; only the identity depends on the ticker.
    pub fn record_for(&self, ticker: &Ticker) -> StockRecord {
        StockRecord {
            identity: self.identity(ticker),
            profile: self.profile(),
            pricing: self.pricing(),
            volume: self.volume(),
            valuation: self.valuation(),
            performance: self.performance(),
            signals: self.signals(),
            dividend: self.dividend(),
            risk: self.risk(),
            ratings: self.ratings(),
        }
    }

    pub fn identity(&self, ticker: &Ticker) -> Identity {
        Identity {
            ticker: ticker.clone(),
            company: format!("Sample Company ({ticker})"),
            sector: "Technology".to_string(),
            industry: "Consumer Electronics".to_string(),
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile.clone()
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing.clone()
    }

    pub fn price_history(&self) -> Vec<SeriesPoint> {
        self.pricing.history.clone()
    }

    pub fn volume(&self) -> Volume {
        self.volume.clone()
    }

    pub fn volume_history(&self) -> Vec<SeriesPoint> {
        self.volume.history.clone()
    }

    pub fn valuation(&self) -> Valuation {
        self.valuation.clone()
    }

    pub fn performance(&self) -> Performance {
        self.performance.clone()
    }

    pub fn signals(&self) -> Signals {
        self.signals.clone()
    }

    pub fn dividend(&self) -> Dividend {
        self.dividend.clone()
    }

    pub fn risk(&self) -> Risk {
        self.risk.clone()
    }

    pub fn ratings(&self) -> Ratings {
        self.ratings.clone()
    }
}

impl Default for MockDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

// First of each month, January through June 2024.
fn monthly_series(values: &[f64]) -> Vec<SeriesPoint> {
    values
        .iter()
        .zip(1u32..)
        .filter_map(|(value, month)| {
            NaiveDate::from_ymd_opt(2024, month, 1).map(|date| SeriesPoint::new(date, *value))
        })
        .collect()
}
