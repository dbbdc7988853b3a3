use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use lector_core::PipelineConfig;
use serde::{Deserialize, Serialize};

use crate::service::{Result, ServiceError};

/// Default values for configuration options.
mod defaults {
    /// Hosts remote images may be fetched from.
    pub const ALLOWED_DOMAINS: &str = "discord.mx";

    /// Remote fetch timeout in seconds.
    pub const FETCH_TIMEOUT: u64 = 30;

    /// Recognition timeout in seconds.
    pub const RECOGNITION_TIMEOUT: u64 = 60;

    /// Largest accepted remote image: 24MB.
    pub const MAX_IMAGE_SIZE: usize = 24 * 1024 * 1024;

    pub fn allowed_domains() -> Vec<String> {
        ALLOWED_DOMAINS.split(',').map(str::to_owned).collect()
    }
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Comma-separated hosts that URL sources may point at.
    #[cfg_attr(
        feature = "config",
        arg(
            long,
            env = "ALLOWED_DOMAINS",
            value_delimiter = ',',
            default_value = defaults::ALLOWED_DOMAINS
        )
    )]
    pub allowed_domains: Vec<String>,

    /// Timeout in seconds for fetching a remote image.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "FETCH_TIMEOUT", default_value_t = defaults::FETCH_TIMEOUT)
    )]
    pub fetch_timeout: u64,

    /// Timeout in seconds for a single recognition call.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "RECOGNITION_TIMEOUT", default_value_t = defaults::RECOGNITION_TIMEOUT)
    )]
    pub recognition_timeout: u64,

    /// Largest remote image accepted, in bytes.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MAX_IMAGE_SIZE", default_value_t = defaults::MAX_IMAGE_SIZE)
    )]
    pub max_image_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            allowed_domains: defaults::allowed_domains(),
            fetch_timeout: defaults::FETCH_TIMEOUT,
            recognition_timeout: defaults::RECOGNITION_TIMEOUT,
            max_image_size: defaults::MAX_IMAGE_SIZE,
        }
    }
}

impl ServiceConfig {
    /// Replaces the allow-listed hosts.
    pub fn with_allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the recognition timeout in seconds.
    pub fn with_recognition_timeout(mut self, secs: u64) -> Self {
        self.recognition_timeout = secs;
        self
    }

    /// Sets the largest accepted remote image in bytes.
    pub fn with_max_image_size(mut self, max_image_size: usize) -> Self {
        self.max_image_size = max_image_size;
        self
    }

    /// Checks that every limit is usable.
    ///
    /// An empty allow-list is accepted; it rejects every URL source.
    pub fn validate(&self) -> Result<()> {
        if self.fetch_timeout == 0 {
            return Err(ServiceError::config("fetch timeout must be greater than zero"));
        }
        if self.recognition_timeout == 0 {
            return Err(ServiceError::config(
                "recognition timeout must be greater than zero",
            ));
        }
        if self.max_image_size == 0 {
            return Err(ServiceError::config("max image size must be greater than zero"));
        }
        Ok(())
    }

    /// Converts into the pipeline settings.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            allowed_domains: self.allowed_domains.clone(),
            fetch_timeout: Duration::from_secs(self.fetch_timeout),
            recognition_timeout: Duration::from_secs(self.recognition_timeout),
            max_image_size: self.max_image_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_defaults() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());

        let pipeline = config.pipeline_config();
        let expected = PipelineConfig::default();
        assert_eq!(pipeline.allowed_domains, expected.allowed_domains);
        assert_eq!(pipeline.fetch_timeout, expected.fetch_timeout);
        assert_eq!(pipeline.recognition_timeout, expected.recognition_timeout);
        assert_eq!(pipeline.max_image_size, expected.max_image_size);
    }

    #[test]
    fn rejects_zero_limits() {
        let config = ServiceConfig::default().with_recognition_timeout(0);
        assert!(matches!(config.validate(), Err(ServiceError::Config(_))));

        let config = ServiceConfig::default().with_max_image_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn allow_list_is_replaced() {
        let config = ServiceConfig::default().with_allowed_domains(["127.0.0.1", "cdn.example"]);
        assert_eq!(config.pipeline_config().allowed_domains.len(), 2);
    }
}
