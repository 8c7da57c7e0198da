use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unvalidated field map exactly as the quote provider returned it.
///
/// Keys are the provider's display labels (`"P/E"`, `"52W Range"`, ...);
/// values are normally strings, series keys carry JSON arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawQuote {
    fields: BTreeMap<String, Value>,
}

impl RawQuote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Scalar value rendered as trimmed text; arrays, objects and null yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// First key in `keys` that carries a scalar value.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawQuote {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut quote = RawQuote::new();
        for (key, value) in iter {
            quote.insert(key, value);
        }
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_trims_strings_and_renders_numbers() {
        let quote = RawQuote::new()
            .with("Price", " 150.25 ")
            .with("Beta", json!(1.25))
            .with("Price History", json!([["2024-01-01", 100.0]]));

        assert_eq!(quote.text("Price").as_deref(), Some("150.25"));
        assert_eq!(quote.text("Beta").as_deref(), Some("1.25"));
        assert_eq!(quote.text("Price History"), None);
        assert_eq!(quote.text("Missing"), None);
    }

    #[test]
    fn first_text_follows_key_order() {
        let quote: RawQuote = [("ROIC", "12.5%")].into_iter().collect();
        assert_eq!(quote.first_text(&["ROI", "ROIC"]).as_deref(), Some("12.5%"));
    }
}
