//! twauth - OAuth 1.0a PIN authorization CLI
//!
#![doc = "twauth - OAuth 1.0a PIN authorization CLI"]
#![doc = "Main entry point for the twauth application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use twauth::cli::{Cli, Commands};
use twauth::commands;
use twauth::config::Config;
use twauth::pin::ConsolePinProvider;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Authorize { .. } => {
            tracing::info!("Starting PIN authorization");
            let mut stdout = std::io::stdout();
            commands::authorize::run(&config, &ConsolePinProvider, &mut stdout).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so stdout only carries the authorization URL and the
/// credential lines.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "twauth=debug" } else { "twauth=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
