//! Currency conversion abstractions

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Units of `to` per one unit of `from`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// Rates published for a single source currency, keyed by lower-cased code.
///
/// Built fresh for every lookup and dropped right after.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    pub date: Option<NaiveDate>,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Reads a `{"date": "YYYY-MM-DD", "<code>": <rate>, ...}` document.
    ///
    /// Entries whose value is not a number are skipped; an unparseable date
    /// is treated as absent.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(anyhow!("Expected a JSON object of rates"));
        };

        let mut table = RateTable::default();
        for (key, value) in map {
            if key == "date" {
                table.date = value
                    .as_str()
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
                continue;
            }
            if let Some(rate) = value.as_f64() {
                table.rates.insert(key.to_lowercase(), rate);
            }
        }
        Ok(table)
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rate_table_from_json() {
        let table = RateTable::from_json(json!({
            "date": "2024-03-15",
            "gbp": 0.8543
        }))
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rate("gbp"), Some(0.8543));
        assert_eq!(table.rate("GBP"), Some(0.8543));
        assert_eq!(table.date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_rate_table_skips_non_numeric_entries() {
        let table = RateTable::from_json(json!({
            "date": "not a date",
            "gbp": "0.85",
            "eur": 1.1
        }))
        .unwrap();

        assert!(table.date.is_none());
        assert_eq!(table.rate("gbp"), None);
        assert_eq!(table.rate("eur"), Some(1.1));
    }

    #[test]
    fn test_rate_table_rejects_non_object() {
        let result = RateTable::from_json(json!([1, 2, 3]));
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Expected a JSON object of rates"
        );
    }

    #[test]
    fn test_rate_table_missing_code() {
        let table = RateTable::from_json(json!({})).unwrap();
        assert!(table.is_empty());
        assert!(table.rate("inr").is_none());
    }
}
