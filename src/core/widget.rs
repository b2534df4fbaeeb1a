//! Binds an input source and an output sink to the resolver.

use tracing::{debug, info};

use crate::core::conversion::{ConversionOutcome, ConversionRequest, DEFAULT_AMOUNT, RateResolver};

/// Supplies the raw values a conversion is computed from.
pub trait InputSource {
    fn amount(&self) -> String;
    fn from_currency(&self) -> String;
    fn to_currency(&self) -> String;
    /// Replaces the amount shown to the user, e.g. after normalization.
    fn set_amount(&mut self, value: &str);
}

/// Receives the final display text.
pub trait OutputSink {
    fn render(&mut self, display_text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Load,
    Submit,
}

pub struct ConverterWidget<'a, I, O> {
    resolver: RateResolver<'a>,
    input: I,
    output: O,
}

impl<'a, I, O> ConverterWidget<'a, I, O>
where
    I: InputSource,
    O: OutputSink,
{
    pub fn new(resolver: RateResolver<'a>, input: I, output: O) -> Self {
        ConverterWidget {
            resolver,
            input,
            output,
        }
    }

    /// Entry point for the initial conversion shown on start-up.
    pub async fn on_load(&mut self) -> ConversionOutcome {
        self.update(Trigger::Load).await
    }

    /// Entry point for an explicit user submission.
    pub async fn on_submit(&mut self) -> ConversionOutcome {
        self.update(Trigger::Submit).await
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    async fn update(&mut self, trigger: Trigger) -> ConversionOutcome {
        let request = ConversionRequest::new(
            &self.input.amount(),
            &self.input.from_currency(),
            &self.input.to_currency(),
        );
        debug!(?trigger, ?request, "Updating exchange rate");

        if request.amount_defaulted {
            self.input.set_amount(&DEFAULT_AMOUNT.to_string());
        }

        let outcome = self.resolver.resolve_request(&request).await;
        info!(success = outcome.is_success(), "Conversion finished");
        self.output.render(outcome.display_text());
        outcome
    }
}
