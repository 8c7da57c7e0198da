//! Free-form user input to ticker symbol.

pub mod openrouter;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::errors::{DashboardError, Result};
use crate::models::ticker::Ticker;

pub use openrouter::OpenRouterLookup;

/// Company names recognised without any lookup, matched case-insensitively.
///
/// No name may equal a different entry's ticker, otherwise resolving a
/// resolved ticker could change it.
pub const KNOWN_COMPANIES: [(&str, &str); 20] = [
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("alphabet", "GOOGL"),
    ("amazon", "AMZN"),
    ("tesla", "TSLA"),
    ("meta", "META"),
    ("facebook", "META"),
    ("nvidia", "NVDA"),
    ("netflix", "NFLX"),
    ("intel", "INTC"),
    ("amd", "AMD"),
    ("advanced micro devices", "AMD"),
    ("ibm", "IBM"),
    ("oracle", "ORCL"),
    ("salesforce", "CRM"),
    ("adobe", "ADBE"),
    ("berkshire hathaway", "BRK.B"),
    ("coca-cola", "KO"),
    ("walmart", "WMT"),
];

/// External name-to-symbol service consulted when the static path fails.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Best guess at the ticker for `name`, unvalidated.
    async fn lookup(&self, name: &str) -> Result<Option<String>>;
}

pub struct InputResolver {
    names: HashMap<String, Ticker>,
    lookup: Option<Arc<dyn NameLookup>>,
}

impl InputResolver {
    pub fn new() -> Self {
        let names = KNOWN_COMPANIES
            .iter()
            .filter_map(|(name, symbol)| Ticker::parse(symbol).ok().map(|t| (name.to_string(), t)))
            .collect();
        Self { names, lookup: None }
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn NameLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn has_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    /// Static resolution: known company name, then ticker pattern.
    pub fn resolve(&self, input: &str) -> Result<Ticker> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DashboardError::unresolved(input, "company name is required"));
        }
        if let Some(ticker) = self.names.get(&trimmed.to_lowercase()) {
            debug!("resolved '{}' to {} by name", trimmed, ticker);
            return Ok(ticker.clone());
        }
        if Ticker::matches_pattern(trimmed) {
            return Ticker::parse(trimmed);
        }
        Err(DashboardError::unresolved(input, "no matching company or ticker symbol"))
    }

    /// Static resolution, then the configured lookup service if any.
    pub async fn resolve_with_lookup(&self, input: &str) -> Result<Ticker> {
        let unresolved = match self.resolve(input) {
            Ok(ticker) => return Ok(ticker),
            Err(e) => e,
        };
        let Some(lookup) = self.lookup.as_ref().filter(|_| !input.trim().is_empty()) else {
            return Err(unresolved);
        };

        info!("Looking up ticker for '{}'", input.trim());
        match lookup.lookup(input.trim()).await {
            Ok(Some(answer)) => match Ticker::parse(&answer) {
                Ok(ticker) => {
                    info!("Lookup resolved '{}' to {}", input.trim(), ticker);
                    Ok(ticker)
                }
                Err(_) => {
                    warn!("Lookup answered '{}' for '{}', not a ticker", answer, input.trim());
                    Err(unresolved)
                }
            },
            Ok(None) => Err(unresolved),
            Err(e) => {
                warn!("Ticker lookup failed for '{}': {}", input.trim(), e);
                Err(unresolved)
            }
        }
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}
