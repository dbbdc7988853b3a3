//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # Request timeout, body limit
//! ├── service: ServiceConfig        # Allow-list, fetch/recognition limits
//! └── engine: EngineConfig          # Tesseract, PaddleOCR or mock
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod engine;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use lector_server::middleware::MiddlewareConfig;
use lector_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub use self::engine::EngineConfig;
pub use self::server::ServerConfig;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "lector")]
#[command(about = "Image text-recognition server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (timeouts, body limits).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Image source and pipeline limits.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Recognition engine selection and backend settings.
    #[clap(flatten)]
    pub engine: EngineConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// `RUST_LOG` selects the filter; `info` is used when it is unset.
    pub fn init_tracing() -> anyhow::Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info"))
            .context("failed to create env filter")?;

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
            .context("failed to install tracing subscriber")?;

        Ok(())
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        self.engine
            .validate()
            .context("invalid engine configuration")?;
        Ok(())
    }

    /// Logs configuration (no secrets).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.engine.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.middleware.request_timeout,
            max_body_size = self.middleware.max_body_size,
            "middleware configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            allowed_domains = ?self.service.allowed_domains,
            fetch_timeout_secs = self.service.fetch_timeout,
            recognition_timeout_secs = self.service.recognition_timeout,
            max_image_size = self.service.max_image_size,
            "service configuration"
        );
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            "starting lector server"
        );

        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "dotenv").then_some("dotenv"),
            cfg!(feature = "mock").then_some("mock"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::engine::EngineKind;
    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["lector"]).unwrap();
        assert_eq!(cli.server.port, 3000);
        assert_eq!(cli.middleware.request_timeout, 300);
        assert_eq!(cli.service.allowed_domains, vec!["discord.mx".to_owned()]);
        assert_eq!(cli.service.fetch_timeout, 30);
        assert_eq!(cli.service.recognition_timeout, 60);
        assert_eq!(cli.engine.engine, EngineKind::Tesseract);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn parses_allow_list() {
        let cli = Cli::try_parse_from([
            "lector",
            "--allowed-domains",
            "cdn.example.com,media.example.com",
            "--recognition-timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(
            cli.service.allowed_domains,
            vec!["cdn.example.com".to_owned(), "media.example.com".to_owned()]
        );
        assert_eq!(cli.service.recognition_timeout, 5);
    }

    #[test]
    fn rejects_invalid_values() {
        let cli = Cli::try_parse_from(["lector", "--fetch-timeout", "0"]).unwrap();
        assert!(cli.validate().is_err());

        let cli = Cli::try_parse_from(["lector", "--engine", "paddle"]).unwrap();
        assert!(cli.validate().is_err());
    }
}
