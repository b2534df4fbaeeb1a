use super::convert::{SpinnerRateProvider, TerminalInput, TerminalSink};
use super::ui;
use crate::core::config::AppConfig;
use crate::core::{ConverterWidget, CurrencyRateProvider, RateResolver};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Submit,
    Quit,
}

/// Applies a `[amount] [from] [to]` line to the form.
///
/// Missing tokens keep their previous values, so an empty line resubmits.
pub fn apply_line(input: &mut TerminalInput, line: &str) -> LineAction {
    let mut tokens = line.split_whitespace();
    let Some(amount) = tokens.next() else {
        return LineAction::Submit;
    };
    if matches!(amount.to_lowercase().as_str(), "quit" | "exit") {
        return LineAction::Quit;
    }

    input.amount = amount.to_string();
    if let Some(from) = tokens.next() {
        input.from = from.to_string();
    }
    if let Some(to) = tokens.next() {
        input.to = to.to_string();
    }
    LineAction::Submit
}

/// Converts once on start-up, then once per line read from `reader`.
pub async fn run<R, W>(
    config: &AppConfig,
    provider: &dyn CurrencyRateProvider,
    reader: R,
    writer: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    eprintln!(
        "{}\n{}",
        ui::style_text("Currency converter", ui::StyleType::Title),
        ui::style_text(
            "Enter `[amount] [from] [to]` to convert, `quit` to exit.",
            ui::StyleType::Subtle
        )
    );

    let spinner = SpinnerRateProvider::new(provider);
    let mut widget = ConverterWidget::new(
        RateResolver::new(&spinner),
        TerminalInput::from_config(config),
        TerminalSink::new(writer),
    );
    widget.on_load().await;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match apply_line(widget.input_mut(), &line) {
            LineAction::Quit => break,
            LineAction::Submit => {
                debug!(input = ?widget.input(), "Submitting");
                widget.on_submit().await;
            }
        }
    }

    Ok(())
}
