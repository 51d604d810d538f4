//! `twauth authorize` command handler
//!
//! Runs the out-of-band handshake end to end:
//!
//! 1. Check the consumer credentials (no network traffic if they are empty).
//! 2. Fetch a temporary token and show the authorization URL.
//! 3. Ask the [`PinProvider`] for the verifier PIN.
//! 4. Exchange the PIN for access credentials.
//! 5. Print `ACCESS_KEY = '...'` and `ACCESS_SECRET = '...'`.
//!
//! Every failure is terminal; the operator simply runs the command again.

use std::io::Write;

use crate::config::Config;
use crate::error::Result;
use crate::oauth::{AccessCredentials, OAuthHandshake};
use crate::pin::PinProvider;

/// Prompt shown when asking for the verifier.
pub const PIN_PROMPT: &str = "PIN: ";

/// Run the interactive authorization and write the result to `out`
///
/// # Arguments
///
/// * `config` - Validated configuration
/// * `pins` - Source of the verifier PIN
/// * `out` - Sink for the authorization URL and the credential lines
///
/// # Returns
///
/// The access credentials that were printed
///
/// # Errors
///
/// Returns the first error encountered. Nothing is written to `out` after
/// a failure, so a failed exchange never prints credentials.
///
/// # Examples
///
/// ```no_run
/// use twauth::commands::authorize;
/// use twauth::config::Config;
/// use twauth::pin::ConsolePinProvider;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load("config/config.yaml", &Default::default())?;
/// config.validate()?;
/// authorize::run(&config, &ConsolePinProvider, &mut std::io::stdout()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run<W: Write>(
    config: &Config,
    pins: &dyn PinProvider,
    out: &mut W,
) -> Result<AccessCredentials> {
    let consumer = config.consumer_credentials()?;
    let mut handshake = OAuthHandshake::from_config(consumer, config)?;

    let url = handshake.get_authorization_url().await?;
    writeln!(out, "Please authorize: {}", url)?;
    out.flush()?;

    let pin = pins.read_pin(PIN_PROMPT).await?;
    let creds = handshake.get_access_token(pin.trim()).await?;

    write_credentials(out, &creds)?;
    Ok(creds)
}

/// Writes the two copy-pasteable credential lines.
pub fn write_credentials<W: Write>(out: &mut W, creds: &AccessCredentials) -> Result<()> {
    writeln!(out, "ACCESS_KEY = '{}'", creds.key())?;
    writeln!(out, "ACCESS_SECRET = '{}'", creds.secret())?;
    out.flush()?;
    Ok(())
}
