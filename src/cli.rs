//! Command-line interface definition for twauth
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};

/// twauth - OAuth 1.0a PIN authorization helper
///
/// Walks an operator through the out-of-band OAuth 1.0a handshake and prints
/// the resulting access token and secret.
#[derive(Parser, Debug, Clone)]
#[command(name = "twauth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "TWAUTH_CONFIG", default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for twauth
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive PIN authorization and print the access credentials
    Authorize {
        /// Consumer key (overrides config file and TWAUTH_CONSUMER_KEY)
        #[arg(long)]
        consumer_key: Option<String>,

        /// Consumer secret (overrides config file and TWAUTH_CONSUMER_SECRET)
        #[arg(long)]
        consumer_secret: Option<String>,

        /// Timeout in seconds for each request to the provider
        #[arg(long)]
        timeout: Option<u64>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Authorize {
                consumer_key: None,
                consumer_secret: None,
                timeout: None,
            },
        }
    }
}
