//! Test utilities for twauth
//!
//! Temporary directory management, config fixtures and assertion helpers
//! shared by the unit tests.

use crate::config::Config;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error's display text contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration with consumer credentials filled in
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.consumer.key = "test-consumer-key".to_string();
    config.consumer.secret = "test-consumer-secret".to_string();
    config
}

/// Create a test configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
consumer:
  key: yaml-consumer-key
  secret: yaml-consumer-secret

endpoints:
  request_token_url: https://api.twitter.com/oauth/request_token
  authorize_url: https://api.twitter.com/oauth/authorize
  access_token_url: https://api.twitter.com/oauth/access_token

http:
  timeout_seconds: 10
  user_agent: twauth-tests
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TwauthError;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: crate::error::Result<()> =
            Err(TwauthError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: crate::error::Result<()> =
            Err(TwauthError::Config("different error".to_string()).into());
        assert_error_contains(result, "not present");
    }

    #[test]
    fn test_test_config() {
        let config = test_config();
        assert!(config.validate().is_ok());
        assert!(config.consumer_credentials().is_ok());
    }

    #[test]
    fn test_test_config_yaml() {
        let yaml = test_config_yaml();
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.consumer.key, "yaml-consumer-key");
        assert_eq!(config.http.timeout_seconds, 10);
        assert_eq!(config.http.user_agent, "twauth-tests");
    }
}
