use anyhow::Result;
use clap::{Parser, Subcommand};
use rateconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for rateconv::AppCommand {
    fn from(cmd: Commands) -> rateconv::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                rateconv::AppCommand::Convert { amount, from, to }
            }
            Commands::Interactive => rateconv::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert; empty or below 1 converts 1
        amount: Option<String>,
        /// Source currency code, e.g. USD
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code, e.g. EUR
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Convert repeatedly from lines read on stdin
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => rateconv::cli::setup::setup(),
        Some(cmd) => rateconv::run_command(cmd.into(), config_path).await,
        None => rateconv::run_command(rateconv::AppCommand::Load, config_path).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
