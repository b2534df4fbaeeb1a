pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::convert::TerminalInput;
use crate::core::ConversionOutcome;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Conversion shown on start-up, using the configured values.
    Load,
    /// Explicit conversion; unset values fall back to the configuration.
    Convert {
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
    /// Load once, then convert each line read from stdin.
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = providers::CurrencyApiProvider::new(config.currency_api_url());

    let outcome: ConversionOutcome = match command {
        AppCommand::Load => cli::convert::load(&config, &provider).await,
        AppCommand::Convert { amount, from, to } => {
            let input = TerminalInput::from_config(&config).with_overrides(amount, from, to);
            cli::convert::submit(input, &provider).await
        }
        AppCommand::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            return cli::interactive::run(&config, &provider, stdin, std::io::stdout()).await;
        }
    };

    debug!(success = outcome.is_success(), "Command finished");
    Ok(())
}
