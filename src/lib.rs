//! twauth - OAuth 1.0a PIN authorization library
//!
//! This library drives the out-of-band OAuth 1.0a handshake used by
//! Twitter-compatible APIs: obtain a temporary token, let an operator approve
//! access and type the verifier PIN, then exchange it for a long-lived access
//! token and secret.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `oauth`: Credential types and the signed handshake context
//! - `pin`: Verifier PIN sources (console and fixed)
//! - `commands`: The `authorize` command handler
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use twauth::commands::authorize;
//! use twauth::pin::ConsolePinProvider;
//! use twauth::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     authorize::run(&config, &ConsolePinProvider, &mut std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod oauth;
pub mod pin;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TwauthError};
pub use oauth::{AccessCredentials, ConsumerCredentials, OAuthHandshake};
pub use pin::{ConsolePinProvider, FixedPinProvider, PinProvider};

#[cfg(test)]
pub mod test_utils;
