//! Out-of-band OAuth 1.0a handshake
//!
//! [`OAuthHandshake`] is the context for one authorization attempt. It owns
//! the consumer credentials, the provider endpoints, and the
//! transport-security flag. Once the first leg succeeds it also owns the
//! temporary request token.
//!
//! # Flow overview
//!
//! 1. [`OAuthHandshake::get_authorization_url`] POSTs a signed request with
//!    `oauth_callback=oob` to the request token endpoint, stores the returned
//!    temporary token, and returns the page the operator must visit.
//! 2. The operator approves access and reads the verifier PIN off the page.
//! 3. [`OAuthHandshake::get_access_token`] POSTs a request signed with the
//!    temporary token and carrying `oauth_verifier` to the access token
//!    endpoint and returns the long-lived access credentials.
//!
//! Requests are signed with HMAC-SHA1 by `reqwest-oauth1`. Protocol
//! parameters passed as query pairs (`oauth_callback`, `oauth_verifier`) are
//! moved into the `Authorization` header by the signer.

use std::time::Duration;

use reqwest_oauth1::{OAuthClientProvider, Secrets};
use url::Url;

use crate::config::{is_loopback, Config, EndpointsConfig};
use crate::error::{Result, TwauthError};
use crate::oauth::types::{AccessCredentials, ConsumerCredentials, RequestToken};

/// Callback value that selects the PIN (out-of-band) flow.
pub const OOB_CALLBACK: &str = "oob";

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Parsed provider endpoint URLs.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Temporary credential request endpoint
    pub request_token: Url,
    /// Resource owner authorization page
    pub authorize: Url,
    /// Token request endpoint
    pub access_token: Url,
}

impl Endpoints {
    /// Parses the configured endpoint strings.
    ///
    /// # Errors
    ///
    /// Returns [`TwauthError::Url`] if any endpoint is not an absolute URL.
    pub fn from_config(config: &EndpointsConfig) -> Result<Self> {
        Ok(Self {
            request_token: Url::parse(&config.request_token_url).map_err(TwauthError::Url)?,
            authorize: Url::parse(&config.authorize_url).map_err(TwauthError::Url)?,
            access_token: Url::parse(&config.access_token_url).map_err(TwauthError::Url)?,
        })
    }
}

// ---------------------------------------------------------------------------
// OAuthHandshake
// ---------------------------------------------------------------------------

/// Handshake context for one out-of-band authorization.
///
/// # Examples
///
/// ```no_run
/// use twauth::config::Config;
/// use twauth::oauth::{ConsumerCredentials, OAuthHandshake};
///
/// # async fn example() -> twauth::error::Result<()> {
/// let config = Config::default();
/// let consumer = ConsumerCredentials::new("consumer-key", "consumer-secret");
/// let mut handshake = OAuthHandshake::from_config(consumer, &config)?;
///
/// let url = handshake.get_authorization_url().await?;
/// println!("Please authorize: {}", url);
/// let creds = handshake.get_access_token("123456").await?;
/// # let _ = creds;
/// # Ok(())
/// # }
/// ```
pub struct OAuthHandshake {
    http: reqwest::Client,
    consumer: ConsumerCredentials,
    endpoints: Endpoints,
    secure: bool,
    request_token: Option<RequestToken>,
}

impl OAuthHandshake {
    /// Creates a handshake with an explicit HTTP client.
    ///
    /// # Arguments
    ///
    /// * `http` - Client used for both provider calls; it should carry a
    ///   request timeout.
    /// * `consumer` - Application credentials.
    /// * `endpoints` - Provider endpoints.
    /// * `secure` - When set, the provider endpoints must be HTTPS (loopback
    ///   hosts excepted) and a plain-HTTP authorization URL is upgraded.
    pub fn new(
        http: reqwest::Client,
        consumer: ConsumerCredentials,
        endpoints: Endpoints,
        secure: bool,
    ) -> Self {
        Self {
            http,
            consumer,
            endpoints,
            secure,
            request_token: None,
        }
    }

    /// Creates a secure handshake from the loaded configuration.
    ///
    /// Builds an HTTP client with the configured per-request timeout and
    /// User-Agent.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn from_config(consumer: ConsumerCredentials, config: &Config) -> Result<Self> {
        let endpoints = Endpoints::from_config(&config.endpoints)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds))
            .user_agent(config.http.user_agent.clone())
            .build()
            .map_err(TwauthError::Http)?;

        Ok(Self::new(http, consumer, endpoints, true))
    }

    /// Whether encrypted transport is enforced.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// The temporary token, once [`Self::get_authorization_url`] succeeded.
    pub fn request_token(&self) -> Option<&RequestToken> {
        self.request_token.as_ref()
    }

    /// Obtains a temporary token and returns the authorization URL to show
    /// the operator.
    ///
    /// # Errors
    ///
    /// Returns [`TwauthError::RequestToken`] if the request fails, times out,
    /// the provider answers with a non-success status, or the response lacks
    /// the token fields. Returns [`TwauthError::Config`] if transport security
    /// is required and the endpoint is not HTTPS.
    pub async fn get_authorization_url(&mut self) -> Result<String> {
        let endpoint = self.endpoints.request_token.clone();
        self.ensure_secure_endpoint(&endpoint)?;

        tracing::info!("Requesting temporary credentials from {}", endpoint);

        let secrets = Secrets::new(self.consumer.key(), self.consumer.secret());
        let body = self
            .post_signed(&endpoint, secrets, ("oauth_callback", OOB_CALLBACK))
            .await
            .map_err(TwauthError::RequestToken)?;

        let token = RequestToken::from_response(&body)?;
        tracing::debug!("Temporary credentials received");

        let url = self.authorization_url(&token);
        self.request_token = Some(token);
        Ok(url.to_string())
    }

    /// Exchanges the stored temporary token and the operator's verifier PIN
    /// for access credentials.
    ///
    /// # Errors
    ///
    /// - [`TwauthError::MissingRequestToken`] if no temporary token has been
    ///   obtained yet.
    /// - [`TwauthError::InvalidPin`] if `verifier` is empty or whitespace;
    ///   no request is sent in that case.
    /// - [`TwauthError::AccessToken`] if the request fails, times out, the
    ///   provider rejects the PIN, or the response lacks the token fields.
    pub async fn get_access_token(&self, verifier: &str) -> Result<AccessCredentials> {
        let token = self
            .request_token
            .as_ref()
            .ok_or(TwauthError::MissingRequestToken)?;

        let verifier = verifier.trim();
        if verifier.is_empty() {
            return Err(TwauthError::InvalidPin("PIN is empty".to_string()).into());
        }

        let endpoint = self.endpoints.access_token.clone();
        self.ensure_secure_endpoint(&endpoint)?;

        tracing::info!("Exchanging verifier for access credentials at {}", endpoint);

        let secrets = Secrets::new(self.consumer.key(), self.consumer.secret())
            .token(token.token(), token.secret());
        let body = self
            .post_signed(&endpoint, secrets, ("oauth_verifier", verifier))
            .await
            .map_err(TwauthError::AccessToken)?;

        let creds = AccessCredentials::from_response(&body)?;
        match creds.screen_name() {
            Some(name) => tracing::info!("Access granted by @{}", name),
            None => tracing::info!("Access granted"),
        }

        Ok(creds)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Builds `authorize?oauth_token=...`, upgrading plain HTTP to HTTPS for
    /// non-loopback hosts when transport security is required.
    fn authorization_url(&self, token: &RequestToken) -> Url {
        let mut url = self.endpoints.authorize.clone();

        if self.secure && url.scheme() == "http" && !is_loopback(&url) {
            // http -> https is always a permitted scheme change.
            let _ = url.set_scheme("https");
            tracing::debug!("Upgraded authorization URL to https");
        }

        url.query_pairs_mut().append_pair("oauth_token", token.token());
        url
    }

    fn ensure_secure_endpoint(&self, url: &Url) -> Result<()> {
        if self.secure && url.scheme() != "https" && !is_loopback(url) {
            return Err(TwauthError::Config(format!(
                "refusing to contact {} over an unencrypted channel",
                url
            ))
            .into());
        }
        Ok(())
    }

    /// POSTs a signed request carrying one extra protocol parameter and
    /// returns the response text. Failures are reported as plain messages so
    /// each leg can wrap them in its own error variant.
    async fn post_signed(
        &self,
        url: &Url,
        secrets: Secrets<'_>,
        oauth_param: (&str, &str),
    ) -> std::result::Result<String, String> {
        let resp = self
            .http
            .clone()
            .oauth1(secrets)
            .post(url.clone())
            .query(&[oauth_param])
            .send()
            .await
            .map_err(|e| transport_failure(url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("endpoint returned {}: {}", status, body.trim()));
        }

        resp.text().await.map_err(|e| transport_failure(url, &e))
    }
}

/// Describes a failed exchange with `url`, calling out timeouts.
fn transport_failure<E>(url: &Url, err: &E) -> String
where
    E: std::error::Error + 'static,
{
    if is_timeout(err) {
        format!("request to {} timed out", url)
    } else {
        format!("request to {} failed: {}", url, err)
    }
}

/// Walks the source chain looking for a reqwest timeout.
fn is_timeout(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e
            .downcast_ref::<reqwest::Error>()
            .map_or(false, reqwest::Error::is_timeout)
        {
            return true;
        }
        current = e.source();
    }
    false
}
