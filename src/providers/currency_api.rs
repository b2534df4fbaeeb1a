use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::core::currency::{CurrencyRateProvider, RateTable};

// CurrencyApiProvider implementation for CurrencyRateProvider
pub struct CurrencyApiProvider {
    base_url: String,
}

impl CurrencyApiProvider {
    pub fn new(base_url: &str) -> Self {
        CurrencyApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn rate_url(&self, from: &str, to: &str) -> String {
        format!("{}/{}/{}.json", self.base_url, from, to)
    }
}

#[async_trait]
impl CurrencyRateProvider for CurrencyApiProvider {
    #[instrument(name = "CurrencyApiRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let from = from.to_lowercase();
        let to = to.to_lowercase();
        let pair = format!("{from}/{to}");

        let url = self.rate_url(&from, &to);
        debug!("Requesting currency rate from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("rateconv/0.1")
            .build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, pair))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                pair
            ));
        }

        let text = response.text().await?;

        let data: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", pair, e))?;
        let table = RateTable::from_json(data)
            .map_err(|e| anyhow!("Unexpected response for {}: {}", pair, e))?;
        debug!(date = ?table.date, "Received rate table");

        table
            .rate(&to)
            .ok_or_else(|| anyhow!("No rate data found for currency pair: {}", pair))
    }
}
