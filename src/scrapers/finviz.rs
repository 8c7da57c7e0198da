use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::config::Config;
use crate::errors::{FetchError, Result};
use crate::models::quote::RawQuote;
use crate::models::stock::SeriesPoint;
use crate::models::ticker::Ticker;
use crate::normalizer::keys;
use crate::scrapers::base::QuoteScraper;
use crate::util;

lazy_static! {
    static ref SNAPSHOT_TABLE: Regex =
        Regex::new(r#"(?s)<table[^>]*snapshot-table2[^>]*>(.*?)</table>"#).unwrap();
    static ref CELL: Regex = Regex::new(r"(?s)<td[^>]*>(.*?)</td>").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref HEADER_COMPANY: Regex =
        Regex::new(r#"(?s)class="quote-header_ticker-wrapper_company"[^>]*>(.*?)</h2>"#).unwrap();
    static ref TITLE: Regex =
        Regex::new(r"(?s)<title>\s*[A-Za-z.\-]+\s*(?:-\s*)?(.*?)\s+Stock Price").unwrap();
    static ref SECTOR: Regex = screener_link("sec");
    static ref INDUSTRY: Regex = screener_link("ind");
    static ref COUNTRY: Regex = screener_link("geo");
    static ref RATINGS_TABLE: Regex = Regex::new(
        r#"(?s)<table[^>]*(?:js-table-ratings|fullview-ratings-outer)[^>]*>(.*?)</table>"#
    )
    .unwrap();
    static ref ROW: Regex = Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").unwrap();
    static ref DESCRIPTION: Regex = Regex::new(
        r#"(?s)class="(?:fullview-profile|quote_profile-bio)"[^>]*>(.*?)</(?:td|div)>"#
    )
    .unwrap();
}

const NOT_FOUND_MARKERS: [&str; 2] = ["Ticker not found", "Symbol not found"];

/// Performance columns used to rebuild a coarse price series, with their
/// look-back in days.
const PERF_LOOKBACK: [(&str, i64); 4] = [
    ("Perf Half Y", 182),
    ("Perf Quarter", 91),
    ("Perf Month", 30),
    ("Perf Week", 7),
];

fn screener_link(filter: &str) -> Regex {
    Regex::new(&format!(
        r#"href="[^"]*screener\.ashx\?v=\d+&(?:amp;)?f={filter}_[^"]*"[^>]*>(.*?)</a>"#
    ))
    .unwrap()
}

/// Finviz quote page scraper
pub struct FinvizScraper {
    client: Client,
    base_url: String,
}

impl FinvizScraper {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.finviz_base_url.clone(),
        })
    }

    pub fn quote_url(&self, ticker: &Ticker) -> String {
        format!("{}/quote.ashx?t={}", self.base_url, ticker)
    }
}

#[async_trait]
impl QuoteScraper for FinvizScraper {
    fn name(&self) -> &'static str {
        "finviz"
    }

    async fn fetch(&self, ticker: &Ticker) -> std::result::Result<RawQuote, FetchError> {
        let url = self.quote_url(ticker);
        info!("Fetching quote for {} from {}", ticker, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(ticker.to_string()));
        }
        if !status.is_success() {
            warn!("{} answered {} for {}", self.name(), status, ticker);
            return Err(FetchError::Unavailable(format!("HTTP {status}")));
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;
        let mut quote = parse_quote_page(&html, ticker)?;

        if let Some(history) = derive_price_history(&quote, Local::now().date_naive()) {
            quote.insert(keys::PRICE_HISTORY, util::series_to_value(&history));
        }
        info!("Fetched {} fields for {}", quote.len(), ticker);
        Ok(quote)
    }
}

/// Parse a quote page into the provider's field map.
pub fn parse_quote_page(html: &str, ticker: &Ticker) -> std::result::Result<RawQuote, FetchError> {
    let Some(table) = SNAPSHOT_TABLE.captures(html).and_then(|c| c.get(1)) else {
        if NOT_FOUND_MARKERS.iter().any(|marker| html.contains(marker)) {
            return Err(FetchError::NotFound(ticker.to_string()));
        }
        return Err(FetchError::Malformed(format!(
            "no snapshot table on quote page for {ticker}"
        )));
    };

    let cells: Vec<String> = CELL
        .captures_iter(table.as_str())
        .filter_map(|c| c.get(1))
        .map(|m| clean_cell(m.as_str()))
        .collect();

    let mut quote = RawQuote::new();
    for pair in cells.chunks_exact(2) {
        let (label, value) = (&pair[0], &pair[1]);
        if label.is_empty() || quote.contains_key(label) {
            continue;
        }
        quote.insert(label.as_str(), value.as_str());
    }
    if quote.is_empty() {
        return Err(FetchError::Malformed(format!("empty snapshot table for {ticker}")));
    }
    debug!("parsed {} snapshot fields for {}", quote.len(), ticker);

    let company = capture_text(&HEADER_COMPANY, html).or_else(|| capture_text(&TITLE, html));
    let profile = [
        (keys::COMPANY, company),
        (keys::SECTOR, capture_text(&SECTOR, html)),
        (keys::INDUSTRY, capture_text(&INDUSTRY, html)),
        (keys::COUNTRY, capture_text(&COUNTRY, html)),
        (keys::DESCRIPTION, capture_text(&DESCRIPTION, html)),
    ];
    for (key, value) in profile {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            quote.insert(key, value);
        }
    }
    // no ratings table means no analyst coverage
    quote.insert(keys::RATINGS, parse_ratings(html));

    Ok(quote)
}

/// Rows of the outer ratings table as `{date, action, firm, rating, price_target}`.
///
/// Dates like `Oct-01-24` are rewritten as ISO dates; anything else is kept verbatim.
pub fn parse_ratings(html: &str) -> Value {
    let Some(table) = RATINGS_TABLE.captures(html).and_then(|c| c.get(1)) else {
        return Value::Array(Vec::new());
    };

    let rows = ROW
        .captures_iter(table.as_str())
        .filter_map(|row| {
            let cells: Vec<String> = CELL
                .captures_iter(row.get(1)?.as_str())
                .filter_map(|c| c.get(1))
                .map(|m| clean_cell(m.as_str()))
                .collect();
            let [date, action, firm, rating, price_target] = <[String; 5]>::try_from(cells).ok()?;
            let date = NaiveDate::parse_from_str(&date, "%b-%d-%y")
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or(date);
            Some(json!({
                "date": date,
                "action": action,
                "firm": firm,
                "rating": rating,
                "price_target": price_target,
            }))
        })
        .collect();
    Value::Array(rows)
}

/// Rebuild a coarse price series from the current price and trailing returns.
///
/// Each return `perf` over `n` days places a point at `price / (1 + perf/100)`
/// dated `n` days before `as_of`. Returns `None` unless at least one return is usable.
pub fn derive_price_history(quote: &RawQuote, as_of: NaiveDate) -> Option<Vec<SeriesPoint>> {
    let price = util::parse_number(&quote.text(keys::PRICE)?)?;

    let mut points: Vec<SeriesPoint> = PERF_LOOKBACK
        .iter()
        .filter_map(|(key, days)| {
            let perf = util::parse_number(&quote.text(key)?)?;
            let factor = 1.0 + perf / 100.0;
            (factor > 0.0).then(|| SeriesPoint::new(as_of - Duration::days(*days), price / factor))
        })
        .collect();
    if points.is_empty() {
        return None;
    }

    points.push(SeriesPoint::new(as_of, price));
    Some(points)
}

fn capture_text(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| clean_cell(m.as_str()))
}

fn clean_cell(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, "");
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&rarr;", "→");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
