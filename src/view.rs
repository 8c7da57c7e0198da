//! Display-ready metric cards shared by the web and terminal shells.

use serde::Serialize;
use serde_json::Value;

use crate::models::quote::RawQuote;
use crate::models::stock::StockRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSection {
    pub title: String,
    pub cards: Vec<Card>,
}

fn card(label: &str, value: impl Into<String>) -> Card {
    Card {
        label: label.to_string(),
        value: value.into(),
    }
}

fn section(title: &str, cards: Vec<Card>) -> CardSection {
    CardSection {
        title: title.to_string(),
        cards,
    }
}

/// Headline cards: price, volume and analyst view.
pub fn overview_sections(record: &StockRecord) -> Vec<CardSection> {
    let pricing = &record.pricing;
    let volume = &record.volume;
    let signals = &record.signals;
    vec![
        section(
            "Price",
            vec![
                card("Current Price", format!("${:.2}", pricing.current)),
                card("52W High", format!("${:.2}", pricing.high_52w)),
                card("52W Low", format!("${:.2}", pricing.low_52w)),
                card("Target Price", signals.target_price.display_money()),
            ],
        ),
        section(
            "Volume",
            vec![
                card("Volume", format_count(volume.current)),
                card("Avg Volume", format_count(volume.average)),
            ],
        ),
        section(
            "Signals",
            vec![
                card("Signal", signals.signal.label()),
                card("Recommendation", signals.recommendation.label()),
            ],
        ),
    ]
}

/// Ratio, return, dividend and risk cards.
pub fn analysis_sections(record: &StockRecord) -> Vec<CardSection> {
    let v = &record.valuation;
    let p = &record.performance;
    let d = &record.dividend;
    let r = &record.risk;
    vec![
        section(
            "Valuation",
            vec![
                card("P/E", v.pe.display()),
                card("P/B", v.pb.display()),
                card("P/S", v.ps.display()),
                card("PEG", v.peg.display()),
            ],
        ),
        section(
            "Performance",
            vec![
                card("ROE", p.roe.display_percent()),
                card("ROI", p.roi.display_percent()),
                card("ROA", p.roa.display_percent()),
                card("Profit Margin", p.profit_margin.display_percent()),
            ],
        ),
        section(
            "Dividend",
            vec![
                card("Dividend", d.amount.display_money()),
                card("Dividend Yield", d.yield_pct.display_percent()),
                card("Payout Ratio", d.payout_ratio.display_percent()),
            ],
        ),
        section(
            "Risk",
            vec![
                card("Beta", r.beta.display()),
                card("Volatility (Week)", r.volatility_week.display_percent()),
                card("Volatility (Month)", r.volatility_month.display_percent()),
            ],
        ),
    ]
}

/// Company profile rows.
pub fn detail_cards(record: &StockRecord) -> Vec<Card> {
    let identity = &record.identity;
    let profile = &record.profile;
    vec![
        card("Ticker", identity.ticker.as_str()),
        card("Company", identity.company.as_str()),
        card("Sector", identity.sector.as_str()),
        card("Industry", identity.industry.as_str()),
        card("Country", profile.country.as_str()),
        card("Market Cap", profile.market_cap.as_str()),
    ]
}

/// Every provider field as fetched, in key order. Lists show their length.
pub fn raw_field_cards(raw: &RawQuote) -> Vec<Card> {
    raw.iter()
        .map(|(key, value)| {
            let shown = match value {
                Value::String(text) => text.clone(),
                Value::Array(items) => format!("[{} entries]", items.len()),
                other => other.to_string(),
            };
            card(key, shown)
        })
        .collect()
}

/// `45231100` as `45,231,100`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Compact magnitude for chart axes, e.g. `1.5M`.
pub fn format_compact(value: f64) -> String {
    match value.abs() {
        v if v >= 1e9 => format!("{:.1}B", value / 1e9),
        v if v >= 1e6 => format!("{:.1}M", value / 1e6),
        v if v >= 1e3 => format!("{:.1}K", value / 1e3),
        _ => format!("{value:.2}"),
    }
}
