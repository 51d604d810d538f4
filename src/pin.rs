//! Verifier PIN input
//!
//! The PIN comes from the operator, so reading it sits behind the
//! [`PinProvider`] trait. The CLI uses [`ConsolePinProvider`]; tests and
//! embedders use [`FixedPinProvider`].

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::{Result, TwauthError};

/// Source of the verifier PIN.
#[async_trait]
pub trait PinProvider: Send + Sync {
    /// Returns the raw line the operator entered. Callers trim it.
    async fn read_pin(&self, prompt: &str) -> Result<String>;
}

/// Reads the PIN from the console.
///
/// On a terminal the line is read with rustyline on a blocking task. When
/// stdin is piped the prompt is written to stdout and one plain line is
/// read, so scripted runs see the same `PIN: ` prompt. End of input or
/// Ctrl-C yields an empty PIN, which the exchange step rejects.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePinProvider;

#[async_trait]
impl PinProvider for ConsolePinProvider {
    async fn read_pin(&self, prompt: &str) -> Result<String> {
        let prompt = prompt.to_string();

        tokio::task::spawn_blocking(move || -> Result<String> {
            if io::stdin().is_terminal() {
                read_interactive(&prompt)
            } else {
                read_piped(&mut io::stdin().lock(), &mut io::stdout(), &prompt)
            }
        })
        .await
        .map_err(|e| {
            TwauthError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("PIN reader task failed: {}", e),
            ))
        })?
    }
}

fn read_interactive(prompt: &str) -> Result<String> {
    let mut editor = DefaultEditor::new().map_err(readline_error)?;
    match editor.readline(prompt) {
        Ok(line) => Ok(line),
        Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
            tracing::debug!("PIN input closed before a line was entered");
            Ok(String::new())
        }
        Err(e) => Err(readline_error(e)),
    }
}

/// Writes `prompt` to `out`, then reads one line from non-terminal input.
///
/// Piped input is not echoed, so the prompt line is terminated here to keep
/// later output on lines of its own.
fn read_piped<R, W>(input: &mut R, out: &mut W, prompt: &str) -> Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{}", prompt).map_err(TwauthError::Io)?;
    out.flush().map_err(TwauthError::Io)?;

    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(TwauthError::Io)?;
    if read == 0 {
        tracing::debug!("PIN input closed before a line was entered");
    }

    writeln!(out).map_err(TwauthError::Io)?;
    out.flush().map_err(TwauthError::Io)?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn readline_error(err: ReadlineError) -> anyhow::Error {
    match err {
        ReadlineError::Io(e) => TwauthError::Io(e).into(),
        other => TwauthError::Io(io::Error::new(io::ErrorKind::Other, other.to_string())).into(),
    }
}

/// Returns a preset PIN and counts how often it was asked for.
///
/// # Examples
///
/// ```
/// use twauth::pin::{FixedPinProvider, PinProvider};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> twauth::error::Result<()> {
/// let pins = FixedPinProvider::new("123456");
/// assert_eq!(pins.read_pin("PIN: ").await?, "123456");
/// assert_eq!(pins.calls(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FixedPinProvider {
    pin: String,
    calls: AtomicUsize,
}

impl FixedPinProvider {
    /// Creates a provider that always answers `pin`.
    pub fn new(pin: impl Into<String>) -> Self {
        Self {
            pin: pin.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the PIN has been requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PinProvider for FixedPinProvider {
    async fn read_pin(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(prompt = %prompt, "Supplying preset PIN");
        Ok(self.pin.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_pin_provider_returns_pin_verbatim() {
        let pins = FixedPinProvider::new("  654321\n");
        assert_eq!(pins.read_pin("PIN: ").await.unwrap(), "  654321\n");
    }

    #[tokio::test]
    async fn test_fixed_pin_provider_counts_calls() {
        let pins = FixedPinProvider::new("1");
        assert_eq!(pins.calls(), 0);
        pins.read_pin("PIN: ").await.unwrap();
        pins.read_pin("PIN: ").await.unwrap();
        assert_eq!(pins.calls(), 2);
    }

    #[tokio::test]
    async fn test_pin_provider_is_object_safe() {
        let pins: Box<dyn PinProvider> = Box::new(FixedPinProvider::new("42"));
        assert_eq!(pins.read_pin("PIN: ").await.unwrap(), "42");
    }

    #[test]
    fn test_readline_error_maps_to_io() {
        let err = readline_error(ReadlineError::Io(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "closed",
        )));
        assert!(matches!(
            err.downcast_ref::<TwauthError>(),
            Some(TwauthError::Io(_))
        ));
    }

    #[test]
    fn test_read_piped_writes_prompt_and_returns_line() {
        let mut input = io::Cursor::new("123456\r\nignored\n");
        let mut out = Vec::new();

        let pin = read_piped(&mut input, &mut out, "PIN: ").unwrap();

        assert_eq!(pin, "123456");
        assert_eq!(String::from_utf8(out).unwrap(), "PIN: \n");
    }

    #[test]
    fn test_read_piped_end_of_input_is_empty() {
        let mut input = io::Cursor::new("");
        let mut out = Vec::new();

        let pin = read_piped(&mut input, &mut out, "PIN: ").unwrap();

        assert!(pin.is_empty());
        assert!(String::from_utf8(out).unwrap().starts_with("PIN: "));
    }
}
