//! Configuration management for twauth
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! Precedence, lowest to highest: built-in defaults, YAML file,
//! `TWAUTH_*` environment variables, command-line flags.

use crate::cli::{Cli, Commands};
use crate::error::{Result, TwauthError};
use crate::oauth::ConsumerCredentials;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::{Host, Url};

/// Main configuration structure for twauth
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application (consumer) credentials
    #[serde(default)]
    pub consumer: ConsumerConfig,

    /// Provider OAuth 1.0a endpoints
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

/// Consumer key and secret identifying the calling application
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Consumer (API) key
    #[serde(default)]
    pub key: String,

    /// Consumer (API) secret
    #[serde(default)]
    pub secret: String,
}

impl std::fmt::Debug for ConsumerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerConfig")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// OAuth 1.0a endpoint URLs of the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Temporary credential (request token) endpoint
    #[serde(default = "default_request_token_url")]
    pub request_token_url: String,

    /// Resource owner authorization page shown to the operator
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    /// Token (access token) endpoint
    #[serde(default = "default_access_token_url")]
    pub access_token_url: String,
}

fn default_request_token_url() -> String {
    "https://api.twitter.com/oauth/request_token".to_string()
}

fn default_authorize_url() -> String {
    "https://api.twitter.com/oauth/authorize".to_string()
}

fn default_access_token_url() -> String {
    "https://api.twitter.com/oauth/access_token".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            request_token_url: default_request_token_url(),
            authorize_url: default_authorize_url(),
            access_token_url: default_access_token_url(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("twauth/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TwauthError::Config(format!("Failed to read config file: {}", e)))?;
        let config: Self = serde_yaml::from_str(&contents)
            .map_err(TwauthError::Yaml)
            .with_context(|| format!("Failed to parse config {}", path))?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(key) = std::env::var("TWAUTH_CONSUMER_KEY") {
            self.consumer.key = key;
            tracing::debug!("Env override: TWAUTH_CONSUMER_KEY");
        }

        if let Ok(secret) = std::env::var("TWAUTH_CONSUMER_SECRET") {
            self.consumer.secret = secret;
            tracing::debug!("Env override: TWAUTH_CONSUMER_SECRET");
        }

        if let Ok(url) = std::env::var("TWAUTH_REQUEST_TOKEN_URL") {
            tracing::debug!(url = %url, "Env override: TWAUTH_REQUEST_TOKEN_URL");
            self.endpoints.request_token_url = url;
        }

        if let Ok(url) = std::env::var("TWAUTH_AUTHORIZE_URL") {
            tracing::debug!(url = %url, "Env override: TWAUTH_AUTHORIZE_URL");
            self.endpoints.authorize_url = url;
        }

        if let Ok(url) = std::env::var("TWAUTH_ACCESS_TOKEN_URL") {
            tracing::debug!(url = %url, "Env override: TWAUTH_ACCESS_TOKEN_URL");
            self.endpoints.access_token_url = url;
        }

        if let Ok(timeout) = std::env::var("TWAUTH_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => {
                    self.http.timeout_seconds = v;
                    tracing::debug!(timeout_seconds = v, "Env override: TWAUTH_TIMEOUT_SECONDS");
                }
                Err(_) => {
                    tracing::warn!("Invalid value for TWAUTH_TIMEOUT_SECONDS: {}", timeout);
                }
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        match &cli.command {
            Commands::Authorize {
                consumer_key,
                consumer_secret,
                timeout,
            } => {
                if let Some(key) = consumer_key {
                    self.consumer.key = key.clone();
                }
                if let Some(secret) = consumer_secret {
                    self.consumer.secret = secret.clone();
                }
                if let Some(t) = timeout {
                    self.http.timeout_seconds = *t;
                }
            }
        }
    }

    /// Validate the configuration
    ///
    /// Checks that every endpoint is an absolute URL served over HTTPS
    /// (loopback hosts excepted) and that the HTTP settings are usable.
    /// Consumer credentials are checked separately by
    /// [`Config::consumer_credentials`] so that the check happens right
    /// before the handshake starts.
    ///
    /// # Errors
    ///
    /// Returns [`TwauthError::Config`] if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let endpoints = [
            ("request_token_url", &self.endpoints.request_token_url),
            ("authorize_url", &self.endpoints.authorize_url),
            ("access_token_url", &self.endpoints.access_token_url),
        ];

        for (name, value) in endpoints {
            let url = Url::parse(value).map_err(|e| {
                TwauthError::Config(format!("endpoints.{} is not a valid URL: {}", name, e))
            })?;

            match url.scheme() {
                "https" => {}
                "http" if is_loopback(&url) => {
                    tracing::debug!("endpoints.{} uses plain HTTP on a loopback host", name);
                }
                other => {
                    return Err(TwauthError::Config(format!(
                        "endpoints.{} must use https (got {}://)",
                        name, other
                    ))
                    .into());
                }
            }
        }

        if self.http.timeout_seconds == 0 {
            return Err(TwauthError::Config(
                "http.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(
                TwauthError::Config("http.user_agent cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }

    /// Returns the consumer credentials, rejecting empty values
    ///
    /// # Errors
    ///
    /// Returns [`TwauthError::MissingCredentials`] if the key or the secret
    /// is empty or whitespace-only
    pub fn consumer_credentials(&self) -> Result<ConsumerCredentials> {
        let key = self.consumer.key.trim();
        let secret = self.consumer.secret.trim();

        if key.is_empty() {
            return Err(TwauthError::MissingCredentials(
                "consumer key is empty; set consumer.key or TWAUTH_CONSUMER_KEY".to_string(),
            )
            .into());
        }

        if secret.is_empty() {
            return Err(TwauthError::MissingCredentials(
                "consumer secret is empty; set consumer.secret or TWAUTH_CONSUMER_SECRET"
                    .to_string(),
            )
            .into());
        }

        Ok(ConsumerCredentials::new(key, secret))
    }
}

/// Returns true when the URL points at the local machine
pub fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
