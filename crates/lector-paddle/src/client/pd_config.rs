//! Configuration for the PaddleX HTTP client.

use std::time::Duration;

use url::Url;

use crate::{Error, Result};

/// Configuration for the PaddleX HTTP client.
///
/// # Examples
///
/// ```ignore
/// use lector_paddle::PdConfig;
/// use std::time::Duration;
///
/// let config = PdConfig::new("http://localhost:8080")?
///     .with_timeout(Duration::from_secs(60))
///     .with_max_retries(2);
/// ```
#[derive(Debug, Clone)]
pub struct PdConfig {
    /// Base URL of the PaddleX pipeline server
    base_url: Url,

    /// API key sent as a bearer token (if required)
    api_key: Option<String>,

    /// Request timeout duration
    timeout: Duration,

    /// Maximum number of retry attempts for retryable errors
    max_retries: u32,

    /// Base delay for linear backoff
    retry_backoff: Duration,

    /// User agent string for HTTP requests
    user_agent: String,
}

impl PdConfig {
    /// Create a new configuration with the given base URL and default settings.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref()).map_err(|e| {
            Error::config(format!("Invalid base URL '{}': {}", base_url.as_ref(), e))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Base URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
            user_agent: format!("lector-paddle/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Get the base URL of the pipeline server.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the API key (if configured).
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the maximum number of retry attempts.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the retry backoff duration.
    pub fn retry_backoff(&self) -> Duration {
        self.retry_backoff
    }

    /// Get the user agent string.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the retry backoff duration.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Resolve an endpoint path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::config(format!("Failed to construct URL for '{}': {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = PdConfig::new("http://localhost:8080").unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8080/");
        assert_eq!(config.api_key(), None);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries(), 2);
    }

    #[test]
    fn test_invalid_url() {
        assert!(PdConfig::new("not a valid url").is_err());
        assert!(PdConfig::new("ftp://localhost").is_err());
    }

    #[test]
    fn test_fluent_api() {
        let config = PdConfig::new("http://localhost:8080")
            .unwrap()
            .with_api_key("my-key")
            .with_timeout(Duration::from_secs(45))
            .with_max_retries(10);

        assert_eq!(config.api_key(), Some("my-key"));
        assert_eq!(config.timeout(), Duration::from_secs(45));
        assert_eq!(config.max_retries(), 10);
    }

    #[test]
    fn test_endpoint() {
        let config = PdConfig::new("http://paddle:8080/").unwrap();
        assert_eq!(
            config.endpoint("ocr").unwrap().as_str(),
            "http://paddle:8080/ocr"
        );
    }
}
