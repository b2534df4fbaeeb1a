use super::ui;
use crate::core::config::AppConfig;
use crate::core::{
    ConversionOutcome, ConverterWidget, CurrencyRateProvider, InputSource, OutputSink,
    RateResolver,
};
use anyhow::Result;
use async_trait::async_trait;
use std::io::Write;
use tracing::error;

/// Form values held between triggers, seeded from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalInput {
    pub amount: String,
    pub from: String,
    pub to: String,
}

impl TerminalInput {
    pub fn from_config(config: &AppConfig) -> Self {
        TerminalInput {
            amount: config.amount.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
        }
    }

    /// Overrides whichever values were given on the command line.
    pub fn with_overrides(
        mut self,
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    ) -> Self {
        if let Some(amount) = amount {
            self.amount = amount;
        }
        if let Some(from) = from {
            self.from = from;
        }
        if let Some(to) = to {
            self.to = to;
        }
        self
    }
}

impl InputSource for TerminalInput {
    fn amount(&self) -> String {
        self.amount.clone()
    }

    fn from_currency(&self) -> String {
        self.from.clone()
    }

    fn to_currency(&self) -> String {
        self.to.clone()
    }

    fn set_amount(&mut self, value: &str) {
        self.amount = value.to_string();
    }
}

/// Writes each display text on its own line.
pub struct TerminalSink<W: Write> {
    writer: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(writer: W) -> Self {
        TerminalSink { writer }
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn render(&mut self, display_text: &str) {
        if let Err(e) = writeln!(self.writer, "{display_text}") {
            error!(error = %e, "Failed to write conversion result");
        }
    }
}

/// Shows a spinner while the wrapped provider is fetching.
pub struct SpinnerRateProvider<'a> {
    inner: &'a dyn CurrencyRateProvider,
}

impl<'a> SpinnerRateProvider<'a> {
    pub fn new(inner: &'a dyn CurrencyRateProvider) -> Self {
        SpinnerRateProvider { inner }
    }
}

#[async_trait]
impl<'a> CurrencyRateProvider for SpinnerRateProvider<'a> {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let pb = ui::new_spinner(format!("Fetching {from} to {to} rate..."));
        let result = self.inner.get_rate(from, to).await;
        pb.finish_and_clear();
        result
    }
}

/// Runs the start-up conversion with the configured values.
pub async fn load(
    config: &AppConfig,
    provider: &dyn CurrencyRateProvider,
) -> ConversionOutcome {
    let input = TerminalInput::from_config(config);
    let spinner = SpinnerRateProvider::new(provider);
    let mut widget = ConverterWidget::new(
        RateResolver::new(&spinner),
        input,
        TerminalSink::new(std::io::stdout()),
    );
    widget.on_load().await
}

/// Runs a single submitted conversion.
pub async fn submit(
    input: TerminalInput,
    provider: &dyn CurrencyRateProvider,
) -> ConversionOutcome {
    let spinner = SpinnerRateProvider::new(provider);
    let mut widget = ConverterWidget::new(
        RateResolver::new(&spinner),
        input,
        TerminalSink::new(std::io::stdout()),
    );
    widget.on_submit().await
}
