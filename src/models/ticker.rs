use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::errors::{DashboardError, Result};

/// Normalized ticker symbol: 1-6 characters, leading letter, then letters or dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub const MAX_LEN: usize = 6;

    /// Parse and uppercase a ticker symbol.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DashboardError::unresolved(input, "ticker symbol is empty"));
        }
        if !Self::matches_pattern(trimmed) {
            return Err(DashboardError::unresolved(
                input,
                format!(
                    "not a ticker symbol (1-{} letters or dots, starting with a letter)",
                    Self::MAX_LEN
                ),
            ));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Whether `input` looks like a ticker symbol, ignoring case.
    pub fn matches_pattern(input: &str) -> bool {
        let len = input.chars().count();
        if len == 0 || len > Self::MAX_LEN {
            return false;
        }
        let mut chars = input.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        starts_with_letter && chars.all(|c| c.is_ascii_alphabetic() || c == '.')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_uppercases() {
        assert_eq!(Ticker::parse(" aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Ticker::parse("brk.b").unwrap().as_str(), "BRK.B");
    }

    #[test]
    fn rejects_bad_shapes() {
        for input in ["", "1AAPL", "TOOLONGX", "AA$L", ".AB", "AB CD"] {
            assert!(Ticker::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn parse_is_idempotent() {
        let once = Ticker::parse("msft").unwrap();
        let twice = Ticker::parse(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn serializes_as_plain_string() {
        let ticker = Ticker::parse("tsla").unwrap();
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"TSLA\"");
        let back: Ticker = serde_json::from_str("\"tsla\"").unwrap();
        assert_eq!(back, ticker);
    }
}
