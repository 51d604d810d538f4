//! Credential types exchanged during the OAuth 1.0a handshake
//!
//! Provider responses on both legs are `application/x-www-form-urlencoded`
//! bodies; the parsers here turn them into typed credentials and reject
//! responses that lack the mandatory token fields.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TwauthError};

/// Parses a form-encoded response body into a key/value map.
///
/// Later duplicates win; providers never repeat token fields.
pub(crate) fn parse_form(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.trim().as_bytes())
        .into_owned()
        .collect()
}

fn required(
    fields: &HashMap<String, String>,
    name: &str,
    err: fn(String) -> TwauthError,
) -> Result<String> {
    match fields.get(name) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(err(format!("response is missing {}", name)).into()),
    }
}

// ---------------------------------------------------------------------------
// ConsumerCredentials
// ---------------------------------------------------------------------------

/// Consumer key and secret identifying the calling application.
///
/// Immutable once built. The secret is never shown by `Debug`.
///
/// # Examples
///
/// ```
/// use twauth::oauth::ConsumerCredentials;
///
/// let consumer = ConsumerCredentials::new("key", "s3cr3t");
/// assert_eq!(consumer.key(), "key");
/// assert!(!format!("{:?}", consumer).contains("s3cr3t"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerCredentials {
    key: String,
    secret: String,
}

impl ConsumerCredentials {
    /// Creates consumer credentials from a key and secret.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// The consumer key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The consumer secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RequestToken
// ---------------------------------------------------------------------------

/// Temporary credentials returned by the request token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestToken {
    token: String,
    secret: String,
}

impl RequestToken {
    /// Creates a token pair from raw values.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }

    /// Parses the request token endpoint response body.
    ///
    /// # Errors
    ///
    /// Returns [`TwauthError::RequestToken`] if `oauth_token` or
    /// `oauth_token_secret` is missing, or if the provider explicitly
    /// reports `oauth_callback_confirmed` as anything but `true`.
    pub fn from_response(body: &str) -> Result<Self> {
        let fields = parse_form(body);

        if let Some(confirmed) = fields.get("oauth_callback_confirmed") {
            if confirmed != "true" {
                return Err(TwauthError::RequestToken(format!(
                    "provider did not confirm the callback (oauth_callback_confirmed={})",
                    confirmed
                ))
                .into());
            }
        }

        Ok(Self {
            token: required(&fields, "oauth_token", TwauthError::RequestToken)?,
            secret: required(&fields, "oauth_token_secret", TwauthError::RequestToken)?,
        })
    }

    /// The temporary token, sent back as `oauth_token`.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The temporary token secret, used only for signing.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestToken")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// AccessCredentials
// ---------------------------------------------------------------------------

/// Long-lived access key and secret granted after the verifier exchange.
///
/// Twitter also reports the authorizing account's `user_id` and
/// `screen_name`; both are optional here.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredentials {
    key: String,
    secret: String,
    user_id: Option<String>,
    screen_name: Option<String>,
}

impl AccessCredentials {
    /// Parses the access token endpoint response body.
    ///
    /// # Errors
    ///
    /// Returns [`TwauthError::AccessToken`] if `oauth_token` or
    /// `oauth_token_secret` is missing or empty.
    pub fn from_response(body: &str) -> Result<Self> {
        let mut fields = parse_form(body);

        Ok(Self {
            key: required(&fields, "oauth_token", TwauthError::AccessToken)?,
            secret: required(&fields, "oauth_token_secret", TwauthError::AccessToken)?,
            user_id: fields.remove("user_id").filter(|v| !v.is_empty()),
            screen_name: fields.remove("screen_name").filter(|v| !v.is_empty()),
        })
    }

    /// The access token ("access key").
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The access token secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Numeric id of the account that approved access, if reported.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Handle of the account that approved access, if reported.
    pub fn screen_name(&self) -> Option<&str> {
        self.screen_name.as_deref()
    }
}

impl fmt::Debug for AccessCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredentials")
            .field("key", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("screen_name", &self.screen_name)
            .finish()
    }
}
