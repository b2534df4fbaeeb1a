//! Turns a raw amount and a currency pair into display text.

use std::fmt::Display;

use tracing::{debug, instrument, warn};

use crate::core::currency::CurrencyRateProvider;

/// Amount used when the input is empty, invalid or below one.
pub const DEFAULT_AMOUNT: f64 = 1.0;

/// BDT per USD, applied without a network lookup.
pub const USD_BDT_FIXED_RATE: f64 = 110.0;

pub const FETCH_ERROR_MESSAGE: &str = "Error fetching exchange rate. Try again.";

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    /// Amount as typed, or the default when it was replaced.
    pub display_amount: String,
    pub from: String,
    pub to: String,
    /// Set when the raw amount was replaced by [`DEFAULT_AMOUNT`].
    pub amount_defaulted: bool,
}

impl ConversionRequest {
    pub fn new(raw_amount: &str, from: &str, to: &str) -> Self {
        let (amount, display_amount, amount_defaulted) = match parse_amount(raw_amount) {
            Some(amount) => (amount, raw_amount.trim().to_string(), false),
            None => (DEFAULT_AMOUNT, DEFAULT_AMOUNT.to_string(), true),
        };

        ConversionRequest {
            amount,
            display_amount,
            from: normalize_code(from),
            to: normalize_code(to),
            amount_defaulted,
        }
    }

    fn is_fixed_rate_pair(&self) -> bool {
        self.from == "USD" && self.to == "BDT"
    }
}

/// Overflowing input such as `1e400` parses to infinity and is rejected, but
/// a finite amount may still overflow once multiplied and render as `inf`.
fn parse_amount(raw: &str) -> Option<f64> {
    let amount = raw.trim().parse::<f64>().ok()?;
    (amount.is_finite() && amount >= DEFAULT_AMOUNT).then_some(amount)
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Formats with two decimals, rounding exact halves up instead of to even.
fn format_two_decimals(value: f64) -> String {
    // A value is an exact half-cent only when it is an odd number of eighths.
    let eighths = value * 8.0;
    if eighths.is_finite() && eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        return format!("{:.2}", (value * 100.0).ceil() / 100.0);
    }
    format!("{value:.2}")
}

/// Result of a single conversion. Both variants carry the text to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Success { display_text: String },
    Failure { display_text: String },
}

impl ConversionOutcome {
    pub fn display_text(&self) -> &str {
        match self {
            ConversionOutcome::Success { display_text }
            | ConversionOutcome::Failure { display_text } => display_text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }

    fn failure() -> Self {
        ConversionOutcome::Failure {
            display_text: FETCH_ERROR_MESSAGE.to_string(),
        }
    }
}

impl Display for ConversionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_text())
    }
}

/// Resolves conversions against an injected rate provider.
///
/// Holds no state between calls: identical inputs and an unchanged rate
/// always produce the same text.
pub struct RateResolver<'a> {
    provider: &'a dyn CurrencyRateProvider,
}

impl<'a> RateResolver<'a> {
    pub fn new(provider: &'a dyn CurrencyRateProvider) -> Self {
        RateResolver { provider }
    }

    pub async fn resolve(&self, amount: &str, from: &str, to: &str) -> ConversionOutcome {
        let request = ConversionRequest::new(amount, from, to);
        self.resolve_request(&request).await
    }

    #[instrument(
        name = "ResolveConversion",
        skip(self, request),
        fields(from = %request.from, to = %request.to, amount = request.amount)
    )]
    pub async fn resolve_request(&self, request: &ConversionRequest) -> ConversionOutcome {
        if request.is_fixed_rate_pair() {
            debug!("Using fixed rate {}", USD_BDT_FIXED_RATE);
            let final_amount = request.amount * USD_BDT_FIXED_RATE;
            return ConversionOutcome::Success {
                display_text: format!("{} USD = {} BDT", request.display_amount, final_amount),
            };
        }

        match self.provider.get_rate(&request.from, &request.to).await {
            Ok(rate) => {
                debug!(rate, "Received rate");
                let final_amount = request.amount * rate;
                ConversionOutcome::Success {
                    display_text: format!(
                        "{} {} = {} {}",
                        request.display_amount,
                        request.from,
                        format_two_decimals(final_amount),
                        request.to
                    ),
                }
            }
            Err(e) => {
                warn!(error = %e, "Rate lookup failed");
                ConversionOutcome::failure()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Rate provider returning a canned rate and recording every lookup.
    pub(crate) struct FakeRateProvider {
        rate: Option<f64>,
        pub(crate) calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeRateProvider {
        pub(crate) fn with_rate(rate: f64) -> Self {
            FakeRateProvider {
                rate: Some(rate),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            FakeRateProvider {
                rate: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CurrencyRateProvider for FakeRateProvider {
        async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
            self.calls
                .lock()
                .unwrap()
                .push((from.to_string(), to.to_string()));
            self.rate
                .ok_or_else(|| anyhow!("Request error: connection refused"))
        }
    }

    #[test]
    fn test_amount_normalization() {
        for raw in ["", "   ", "0", "0.5", "-3", "abc", "NaN", "inf", "1e400"] {
            let request = ConversionRequest::new(raw, "EUR", "GBP");
            assert_eq!(request.amount, 1.0, "raw amount {raw:?}");
            assert!(request.amount_defaulted, "raw amount {raw:?}");
            assert_eq!(request.display_amount, "1", "raw amount {raw:?}");
        }

        let request = ConversionRequest::new("1", "EUR", "GBP");
        assert_eq!(request.amount, 1.0);
        assert!(!request.amount_defaulted);

        let request = ConversionRequest::new(" 12.50 ", "EUR", "GBP");
        assert_eq!(request.amount, 12.5);
        assert_eq!(request.display_amount, "12.50");
        assert!(!request.amount_defaulted);
    }

    #[test]
    fn test_currency_codes_are_upper_cased() {
        let request = ConversionRequest::new("3", " eur", "gbp ");
        assert_eq!(request.from, "EUR");
        assert_eq!(request.to, "GBP");
    }

    #[tokio::test]
    async fn test_fixed_rate_pair() {
        let provider = FakeRateProvider::failing();
        let resolver = RateResolver::new(&provider);

        let outcome = resolver.resolve("2", "USD", "BDT").await;
        assert_eq!(outcome.display_text(), "2 USD = 220 BDT");
        assert!(outcome.is_success());

        let outcome = resolver.resolve("", "USD", "BDT").await;
        assert_eq!(outcome.display_text(), "1 USD = 110 BDT");

        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fixed_rate_pair_is_not_rounded() {
        let provider = FakeRateProvider::failing();
        let resolver = RateResolver::new(&provider);

        let outcome = resolver.resolve("1.5", "USD", "BDT").await;
        assert_eq!(outcome.display_text(), "1.5 USD = 165 BDT");
    }

    #[tokio::test]
    async fn test_amount_is_shown_as_typed() {
        let provider = FakeRateProvider::with_rate(2.0);
        let resolver = RateResolver::new(&provider);

        let outcome = resolver.resolve("2.50", "USD", "BDT").await;
        assert_eq!(outcome.display_text(), "2.50 USD = 275 BDT");

        let outcome = resolver.resolve("1e2", "USD", "BDT").await;
        assert_eq!(outcome.display_text(), "1e2 USD = 11000 BDT");

        let outcome = resolver.resolve(" 3.0 ", "EUR", "GBP").await;
        assert_eq!(outcome.display_text(), "3.0 EUR = 6.00 GBP");
    }

    #[tokio::test]
    async fn test_overflowing_product_renders_infinity() {
        let provider = FakeRateProvider::failing();
        let resolver = RateResolver::new(&provider);

        let outcome = resolver.resolve("1e308", "USD", "BDT").await;
        assert_eq!(outcome.display_text(), "1e308 USD = inf BDT");
    }

    #[tokio::test]
    async fn test_reverse_fixed_pair_uses_provider() {
        let provider = FakeRateProvider::with_rate(0.0091);
        let resolver = RateResolver::new(&provider);

        let outcome = resolver.resolve("100", "BDT", "USD").await;
        assert_eq!(outcome.display_text(), "100 BDT = 0.91 USD");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_general_pair_rounds_to_two_decimals() {
        let provider = FakeRateProvider::with_rate(0.8543);
        let resolver = RateResolver::new(&provider);

        let outcome = resolver.resolve("5", "EUR", "GBP").await;
        assert_eq!(outcome.display_text(), "5 EUR = 4.27 GBP");
        assert_eq!(
            provider.calls.lock().unwrap().as_slice(),
            &[("EUR".to_string(), "GBP".to_string())]
        );
    }

    #[tokio::test]
    async fn test_half_cent_rounds_up() {
        for (amount, rate, expected) in [
            ("3", 0.375, "3 EUR = 1.13 GBP"),
            ("1", 1.125, "1 EUR = 1.13 GBP"),
            ("2.5", 0.25, "2.5 EUR = 0.63 GBP"),
            ("1", 0.875, "1 EUR = 0.88 GBP"),
            ("4", 0.28125, "4 EUR = 1.13 GBP"),
        ] {
            let provider = FakeRateProvider::with_rate(rate);
            let resolver = RateResolver::new(&provider);
            let outcome = resolver.resolve(amount, "EUR", "GBP").await;
            assert_eq!(outcome.display_text(), expected, "rate {rate}");
        }
    }

    #[tokio::test]
    async fn test_near_half_cent_rounds_by_binary_value() {
        // 1.005 and 1.015 are stored just below their decimal text
        for (rate, expected) in [
            (1.005, "1 EUR = 1.00 GBP"),
            (1.015, "1 EUR = 1.01 GBP"),
            (1.0051, "1 EUR = 1.01 GBP"),
            (1.0049, "1 EUR = 1.00 GBP"),
        ] {
            let provider = FakeRateProvider::with_rate(rate);
            let resolver = RateResolver::new(&provider);
            let outcome = resolver.resolve("1", "EUR", "GBP").await;
            assert_eq!(outcome.display_text(), expected, "rate {rate}");
        }
    }

    #[tokio::test]
    async fn test_general_pair_with_defaulted_amount() {
        let provider = FakeRateProvider::with_rate(83.1234);
        let resolver = RateResolver::new(&provider);

        let outcome = resolver.resolve("0", "USD", "INR").await;
        assert_eq!(outcome.display_text(), "1 USD = 83.12 INR");
    }

    #[tokio::test]
    async fn test_failure_message() {
        let provider = FakeRateProvider::failing();
        let resolver = RateResolver::new(&provider);

        for (amount, from, to) in [("5", "EUR", "GBP"), ("", "JPY", "USD"), ("1000", "x", "y")] {
            let outcome = resolver.resolve(amount, from, to).await;
            assert!(!outcome.is_success());
            assert_eq!(
                outcome.display_text(),
                "Error fetching exchange rate. Try again."
            );
            assert_eq!(outcome.to_string(), FETCH_ERROR_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let provider = FakeRateProvider::with_rate(1.0873);
        let resolver = RateResolver::new(&provider);

        let first = resolver.resolve("42", "EUR", "USD").await;
        let second = resolver.resolve("42", "EUR", "USD").await;
        assert_eq!(first, second);
        assert_eq!(first.display_text(), "42 EUR = 45.67 USD");
        assert_eq!(provider.call_count(), 2);
    }
}
