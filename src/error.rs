//! Error types for twauth
//!
//! This module defines the error types used throughout the authorizer,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for twauth operations
///
/// Covers configuration problems, both legs of the OAuth 1.0a handshake,
/// operator input, and the underlying I/O, parsing and transport failures.
#[derive(Error, Debug)]
pub enum TwauthError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Consumer key or secret missing from configuration
    #[error("Missing consumer credentials: {0}")]
    MissingCredentials(String),

    /// The temporary-credential request was rejected or unreadable
    #[error("Request token error: {0}")]
    RequestToken(String),

    /// The verifier exchange was rejected or unreadable
    #[error("Access token error: {0}")]
    AccessToken(String),

    /// Verifier exchange attempted before a request token was obtained
    #[error("No request token available; request an authorization URL first")]
    MissingRequestToken,

    /// The operator supplied an unusable verifier PIN
    #[error("Invalid PIN: {0}")]
    InvalidPin(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors (connect failures, timeouts, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for twauth operations
///
/// Uses `anyhow::Error` so callers can attach context while still being able
/// to downcast to [`TwauthError`].
pub type Result<T> = anyhow::Result<T>;
