//! Coercion routines shared by the normalizer and the scrapers.
//!
//! Every routine returns `None` on failure; callers decide whether a miss
//! means "unavailable" or "fall back to mock data".

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::models::stock::{Metric, SeriesPoint};

lazy_static! {
    static ref PAREN_PERCENT: Regex = Regex::new(r"\((-?\d+(?:\.\d+)?)%\)").unwrap();
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%d %b %Y"];

/// Markers the provider uses for "no value".
pub fn is_unavailable_marker(text: &str) -> bool {
    matches!(text.trim(), "" | "-" | "--" | "N/A" | "n/a" | "NA")
}

fn clean_numeric(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect()
}

/// Parse a display number such as `$1,234.50` or `32.5%`.
pub fn parse_number(text: &str) -> Option<f64> {
    if is_unavailable_marker(text) {
        return None;
    }
    clean_numeric(text)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Unavailable markers map to `Metric::Unavailable`; unparsable text is a miss.
pub fn parse_metric(text: &str) -> Option<Metric> {
    if is_unavailable_marker(text) {
        return Some(Metric::Unavailable);
    }
    parse_number(text).map(Metric::Value)
}

/// Parse a number with an optional `K`/`M`/`B`/`T` magnitude suffix.
pub fn parse_scaled(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let (digits, multiplier) = match trimmed.chars().last()?.to_ascii_uppercase() {
        'K' => (&trimmed[..trimmed.len() - 1], 1e3),
        'M' => (&trimmed[..trimmed.len() - 1], 1e6),
        'B' => (&trimmed[..trimmed.len() - 1], 1e9),
        'T' => (&trimmed[..trimmed.len() - 1], 1e12),
        _ => (trimmed, 1.0),
    };
    parse_number(digits).map(|v| v * multiplier)
}

/// Non-negative share count, e.g. `45,231,100` or `54.63M`.
pub fn parse_count(text: &str) -> Option<u64> {
    parse_scaled(text)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64)
}

/// Parse a `low - high` range, returning `(low, high)`.
pub fn parse_range(text: &str) -> Option<(f64, f64)> {
    let (a, b) = text.split_once(" - ")?;
    let (a, b) = (parse_number(a)?, parse_number(b)?);
    Some((a.min(b), a.max(b)))
}

/// Percentage in parentheses, e.g. `0.45` from `1.00 (0.45%)`.
pub fn parse_paren_percent(text: &str) -> Option<f64> {
    PAREN_PERCENT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Leading amount of a composite value, e.g. `1.00` from `1.00 (0.45%)`.
pub fn parse_leading_metric(text: &str) -> Option<Metric> {
    parse_metric(text.split_whitespace().next().unwrap_or(""))
}

/// Two space-separated metrics, e.g. weekly/monthly volatility `1.85% 1.62%`.
pub fn parse_metric_pair(text: &str) -> Option<(Metric, Metric)> {
    let mut parts = text.split_whitespace();
    let first = parse_metric(parts.next()?)?;
    let second = parse_metric(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((first, second))
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Parse a dated series from `[{"date": .., "value": ..}]` or `[[date, value]]`.
///
/// Any bad element rejects the whole series. Points come back in date order.
pub fn parse_series(value: &Value) -> Option<Vec<SeriesPoint>> {
    let items = value.as_array()?;
    let mut points = items
        .iter()
        .map(|item| {
            let (date, value) = match item {
                Value::Object(map) => (map.get("date")?, map.get("value")?),
                Value::Array(pair) if pair.len() == 2 => (&pair[0], &pair[1]),
                _ => return None,
            };
            let date = parse_date(date.as_str()?)?;
            let value = match value {
                Value::Number(n) => n.as_f64()?,
                Value::String(s) => parse_scaled(s)?,
                _ => return None,
            };
            (value.is_finite() && value >= 0.0).then(|| SeriesPoint::new(date, value))
        })
        .collect::<Option<Vec<_>>>()?;
    points.sort_by_key(|p| p.date);
    Some(points)
}

/// Encode a series the way `parse_series` reads it.
pub fn series_to_value(points: &[SeriesPoint]) -> Value {
    Value::Array(
        points
            .iter()
            .map(|p| serde_json::json!({ "date": p.date.format("%Y-%m-%d").to_string(), "value": p.value }))
            .collect(),
    )
}
