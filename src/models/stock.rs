use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ticker::Ticker;

pub const UNAVAILABLE_LABEL: &str = "N/A";

/// Numeric field that the provider may explicitly report as unavailable.
///
/// Serializes as a JSON number, or `null` when unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Value(f64),
    Unavailable,
}

impl Metric {
    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Unavailable => None,
        }
    }

    /// Plain number with two decimals, e.g. `25.50`.
    pub fn display(self) -> String {
        self.display_with("", "")
    }

    /// Percent-unit value, e.g. `32.50%`.
    pub fn display_percent(self) -> String {
        self.display_with("", "%")
    }

    /// Dollar amount, e.g. `$165.00`.
    pub fn display_money(self) -> String {
        self.display_with("$", "")
    }

    fn display_with(self, prefix: &str, suffix: &str) -> String {
        match self {
            Metric::Value(v) => format!("{prefix}{v:.2}{suffix}"),
            Metric::Unavailable => UNAVAILABLE_LABEL.to_string(),
        }
    }
}

/// One dated observation of a price or volume series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingSignal {
    Buy,
    Sell,
    Hold,
    Neutral,
}

impl TradingSignal {
    /// Anything that is not an explicit buy/sell/hold reads as neutral.
    pub fn from_text(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "buy" | "strong buy" => TradingSignal::Buy,
            "sell" | "strong sell" => TradingSignal::Sell,
            "hold" => TradingSignal::Hold,
            _ => TradingSignal::Neutral,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TradingSignal::Buy => "Buy",
            TradingSignal::Sell => "Sell",
            TradingSignal::Hold => "Hold",
            TradingSignal::Neutral => "Neutral",
        }
    }
}

impl Display for TradingSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Analyst consensus on the usual five-step scale.
///
/// `Unrated` is the provider explicitly reporting no coverage (`-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
    Unrated,
}

impl Recommendation {
    /// Map a mean analyst score (1.0 = strong buy .. 5.0 = strong sell).
    pub fn from_score(score: f64) -> Option<Self> {
        if !score.is_finite() || !(1.0..=5.0).contains(&score) {
            return None;
        }
        Some(match score {
            s if s < 1.5 => Recommendation::StrongBuy,
            s if s < 2.5 => Recommendation::Buy,
            s if s < 3.5 => Recommendation::Hold,
            s if s < 4.5 => Recommendation::Sell,
            _ => Recommendation::StrongSell,
        })
    }

    pub fn from_text(text: &str) -> Option<Self> {
        let normalized = text.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "strong buy" => Some(Recommendation::StrongBuy),
            "buy" | "outperform" | "overweight" => Some(Recommendation::Buy),
            "hold" | "neutral" => Some(Recommendation::Hold),
            "sell" | "underperform" | "underweight" => Some(Recommendation::Sell),
            "strong sell" => Some(Recommendation::StrongSell),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
            Recommendation::StrongSell => "Strong Sell",
            Recommendation::Unrated => UNAVAILABLE_LABEL,
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub ticker: Ticker,
    pub company: String,
    pub sector: String,
    pub industry: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub country: String,
    pub market_cap: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub current: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub history: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub current: u64,
    pub average: u64,
    pub history: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub pe: Metric,
    pub pb: Metric,
    pub ps: Metric,
    pub peg: Metric,
}

/// Percent-unit return and margin figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub roe: Metric,
    pub roi: Metric,
    pub roa: Metric,
    pub profit_margin: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub signal: TradingSignal,
    pub recommendation: Recommendation,
    pub target_price: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub amount: Metric,
    pub yield_pct: Metric,
    pub payout_ratio: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub beta: Metric,
    pub volatility_week: Metric,
    pub volatility_month: Metric,
}

/// One row of the provider's analyst rating history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalystRating {
    pub date: String,
    pub action: String,
    pub firm: String,
    pub rating: String,
    pub price_target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub summary: String,
    pub entries: Vec<AnalystRating>,
}

impl Ratings {
    /// Summary is the tone of the history: more upgrades than downgrades
    /// reads `Positive`, fewer `Negative`, a tie `Neutral`.
    pub fn from_entries(entries: Vec<AnalystRating>) -> Self {
        let tally = entries.iter().fold(0i64, |acc, entry| {
            let action = entry.action.to_ascii_lowercase();
            if action.contains("upgrade") {
                acc + 1
            } else if action.contains("downgrade") {
                acc - 1
            } else {
                acc
            }
        });
        let summary = match (entries.is_empty(), tally) {
            (true, _) => UNAVAILABLE_LABEL,
            (false, t) if t > 0 => "Positive",
            (false, t) if t < 0 => "Negative",
            _ => "Neutral",
        };
        Self {
            summary: summary.to_string(),
            entries,
        }
    }
}

/// Fully populated, render-ready view of one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub identity: Identity,
    pub profile: Profile,
    pub pricing: Pricing,
    pub volume: Volume,
    pub valuation: Valuation,
    pub performance: Performance,
    pub signals: Signals,
    pub dividend: Dividend,
    pub risk: Risk,
    pub ratings: Ratings,
}

/// Unit of the normalizer's fallback decision.
///
/// The two series are separate units from the scalar fields of their groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Identity,
    Profile,
    Pricing,
    PriceHistory,
    Volume,
    VolumeHistory,
    Valuation,
    Performance,
    Signals,
    Dividend,
    Risk,
    Ratings,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 12] = [
        FieldGroup::Identity,
        FieldGroup::Profile,
        FieldGroup::Pricing,
        FieldGroup::PriceHistory,
        FieldGroup::Volume,
        FieldGroup::VolumeHistory,
        FieldGroup::Valuation,
        FieldGroup::Performance,
        FieldGroup::Signals,
        FieldGroup::Dividend,
        FieldGroup::Risk,
        FieldGroup::Ratings,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FieldGroup::Identity => "identity",
            FieldGroup::Profile => "profile",
            FieldGroup::Pricing => "pricing",
            FieldGroup::PriceHistory => "price_history",
            FieldGroup::Volume => "volume",
            FieldGroup::VolumeHistory => "volume_history",
            FieldGroup::Valuation => "valuation",
            FieldGroup::Performance => "performance",
            FieldGroup::Signals => "signals",
            FieldGroup::Dividend => "dividend",
            FieldGroup::Risk => "risk",
            FieldGroup::Ratings => "ratings",
        }
    }
}

impl Display for FieldGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
