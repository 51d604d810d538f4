use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use twauth::config::Config;
use twauth::oauth::Endpoints;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

pub const REQUEST_TOKEN_PATH: &str = "/oauth/request_token";
pub const AUTHORIZE_PATH: &str = "/oauth/authorize";
pub const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";

/// Environment variables that would leak into spawned binaries.
#[allow(dead_code)]
pub const TWAUTH_ENV_VARS: [&str; 7] = [
    "TWAUTH_CONFIG",
    "TWAUTH_CONSUMER_KEY",
    "TWAUTH_CONSUMER_SECRET",
    "TWAUTH_REQUEST_TOKEN_URL",
    "TWAUTH_AUTHORIZE_URL",
    "TWAUTH_ACCESS_TOKEN_URL",
    "TWAUTH_TIMEOUT_SECONDS",
];

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config whose endpoints all point at the mock provider.
#[allow(dead_code)]
pub fn config_for(server: &MockServer) -> Config {
    let base = server.uri();
    let mut config = Config::default();
    config.consumer.key = "test-consumer-key".to_string();
    config.consumer.secret = "test-consumer-secret".to_string();
    config.endpoints.request_token_url = format!("{}{}", base, REQUEST_TOKEN_PATH);
    config.endpoints.authorize_url = format!("{}{}", base, AUTHORIZE_PATH);
    config.endpoints.access_token_url = format!("{}{}", base, ACCESS_TOKEN_PATH);
    config.http.timeout_seconds = 5;
    config
}

/// Endpoint set rooted at the mock provider.
#[allow(dead_code)]
pub fn endpoints_for(server: &MockServer) -> Endpoints {
    let base = server.uri();
    let url = |path: &str| Url::parse(&format!("{}{}", base, path)).expect("mock server URL");
    Endpoints {
        request_token: url(REQUEST_TOKEN_PATH),
        authorize: url(AUTHORIZE_PATH),
        access_token: url(ACCESS_TOKEN_PATH),
    }
}

/// YAML config file contents pointing at the mock provider.
#[allow(dead_code)]
pub fn config_yaml_for(server: &MockServer) -> String {
    let base = server.uri();
    format!(
        "consumer:\n  key: test-consumer-key\n  secret: test-consumer-secret\n\
         endpoints:\n  request_token_url: {base}{REQUEST_TOKEN_PATH}\n  \
         authorize_url: {base}{AUTHORIZE_PATH}\n  \
         access_token_url: {base}{ACCESS_TOKEN_PATH}\n\
         http:\n  timeout_seconds: 5\n"
    )
}

/// Matches signed requests whose headers or URL mention every needle.
///
/// The mock server may split the `Authorization` header on commas, so the
/// check runs against the rendered header map rather than a single value.
/// Protocol parameters normally travel in the header; the URL is included
/// so a signer that leaves them in the query still matches.
#[allow(dead_code)]
pub struct OAuthHeaderHas(pub Vec<String>);

#[allow(dead_code)]
impl OAuthHeaderHas {
    pub fn new(needles: &[&str]) -> Self {
        Self(needles.iter().map(|s| s.to_string()).collect())
    }
}

impl Match for OAuthHeaderHas {
    fn matches(&self, request: &Request) -> bool {
        let headers = format!("{:?}", request.headers);
        let seen = format!("{} {}", headers, request.url);
        headers.contains("OAuth ")
            && headers.contains("oauth_signature")
            && self.0.iter().all(|needle| seen.contains(needle.as_str()))
    }
}

/// Mounts a request token endpoint that hands out `token`.
#[allow(dead_code)]
pub async fn mount_request_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(REQUEST_TOKEN_PATH))
        .and(OAuthHeaderHas::new(&[
            "oauth_callback=",
            "oob",
            "oauth_consumer_key=",
            "test-consumer-key",
        ]))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "oauth_token={}&oauth_token_secret={}-secret&oauth_callback_confirmed=true",
            token, token
        )))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts an access token endpoint that accepts only `token` + `pin`.
#[allow(dead_code)]
pub async fn mount_access_token(
    server: &MockServer,
    token: &str,
    pin: &str,
    access_key: &str,
    access_secret: &str,
) {
    Mock::given(method("POST"))
        .and(path(ACCESS_TOKEN_PATH))
        .and(OAuthHeaderHas::new(&[
            "oauth_token=",
            token,
            "oauth_verifier=",
            pin,
            "HMAC-SHA1",
        ]))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "oauth_token={}&oauth_token_secret={}&user_id=6253282&screen_name=twitterapi",
            access_key, access_secret
        )))
        .expect(1)
        .mount(server)
        .await;
}
