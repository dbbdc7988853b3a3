//! Recognition engine selection.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result as AnyhowResult, anyhow};
use clap::{Args, ValueEnum};
use lector_core::TextRecognizer;
use lector_paddle::{PdClient, PdConfig};
use lector_tesseract::{TsClient, TsConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Available recognition backends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Local `tesseract` executable.
    #[default]
    Tesseract,
    /// Remote PaddleOCR service.
    Paddle,
    /// Canned in-process engine; requires the `mock` feature.
    Mock,
}

/// Recognition engine configuration.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct EngineConfig {
    /// Recognition backend to use.
    #[arg(long = "engine", env = "OCR_ENGINE", value_enum, default_value_t = EngineKind::Tesseract)]
    pub engine: EngineKind,

    /// Path or name of the tesseract executable.
    #[arg(long, env = "TESSERACT_PATH", default_value = TsConfig::DEFAULT_BINARY)]
    pub tesseract_path: PathBuf,

    /// Directory containing tesseract language data.
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_prefix: Option<PathBuf>,

    /// Tesseract OCR engine mode (`--oem`).
    #[arg(long, env = "TESSERACT_OEM")]
    pub tesseract_oem: Option<u8>,

    /// Tesseract page segmentation mode (`--psm`).
    #[arg(long, env = "TESSERACT_PSM")]
    pub tesseract_psm: Option<u8>,

    /// Base URL of the PaddleOCR service.
    #[arg(long, env = "PADDLE_URL")]
    pub paddle_url: Option<String>,

    /// Bearer token for the PaddleOCR service.
    #[arg(long, env = "PADDLE_API_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub paddle_api_key: Option<String>,

    /// Per-request timeout for the PaddleOCR service, in seconds.
    #[arg(long, env = "PADDLE_TIMEOUT", default_value_t = 30)]
    pub paddle_timeout: u64,

    /// Retries for transient PaddleOCR failures.
    #[arg(long, env = "PADDLE_MAX_RETRIES", default_value_t = 2)]
    pub paddle_max_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            tesseract_path: PathBuf::from(TsConfig::DEFAULT_BINARY),
            tessdata_prefix: None,
            tesseract_oem: None,
            tesseract_psm: None,
            paddle_url: None,
            paddle_api_key: None,
            paddle_timeout: 30,
            paddle_max_retries: 2,
        }
    }
}

impl EngineConfig {
    /// Checks the settings required by the selected backend.
    pub fn validate(&self) -> AnyhowResult<()> {
        match self.engine {
            EngineKind::Tesseract => {
                if self.tesseract_path.as_os_str().is_empty() {
                    return Err(anyhow!("tesseract path must not be empty"));
                }
            }
            EngineKind::Paddle => {
                let url = self
                    .paddle_url
                    .as_deref()
                    .ok_or_else(|| anyhow!("PADDLE_URL is required when OCR_ENGINE=paddle"))?;
                PdConfig::new(url).context("invalid PADDLE_URL")?;
                if self.paddle_timeout == 0 {
                    return Err(anyhow!("paddle timeout must be greater than zero"));
                }
            }
            EngineKind::Mock => {
                if !cfg!(feature = "mock") {
                    return Err(anyhow!(
                        "the mock engine requires building with the `mock` feature"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Builds the selected recognition engine.
    pub fn create_recognizer(&self) -> AnyhowResult<Arc<dyn TextRecognizer>> {
        let engine: Arc<dyn TextRecognizer> = match self.engine {
            EngineKind::Tesseract => Arc::new(TsClient::new(self.tesseract_config())),
            EngineKind::Paddle => {
                let client = PdClient::new(self.paddle_config()?)
                    .context("failed to create PaddleOCR client")?;
                Arc::new(client)
            }
            EngineKind::Mock => create_mock()?,
        };

        Ok(engine)
    }

    fn tesseract_config(&self) -> TsConfig {
        let mut config = TsConfig::new(&self.tesseract_path);
        if let Some(prefix) = &self.tessdata_prefix {
            config = config.with_tessdata_prefix(prefix);
        }
        if let Some(mode) = self.tesseract_oem {
            config = config.with_engine_mode(mode);
        }
        if let Some(mode) = self.tesseract_psm {
            config = config.with_page_segmentation_mode(mode);
        }
        config
    }

    fn paddle_config(&self) -> AnyhowResult<PdConfig> {
        let url = self
            .paddle_url
            .as_deref()
            .ok_or_else(|| anyhow!("PADDLE_URL is required when OCR_ENGINE=paddle"))?;

        let mut config = PdConfig::new(url)
            .context("invalid PADDLE_URL")?
            .with_timeout(Duration::from_secs(self.paddle_timeout))
            .with_max_retries(self.paddle_max_retries);
        if let Some(api_key) = &self.paddle_api_key {
            config = config.with_api_key(api_key);
        }
        Ok(config)
    }

    /// Logs the selected backend without secrets.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            engine = ?self.engine,
            tesseract_path = %self.tesseract_path.display(),
            tessdata_prefix = ?self.tessdata_prefix,
            paddle_url = ?self.paddle_url,
            paddle_api_key_set = self.paddle_api_key.is_some(),
            "engine configuration"
        );
    }
}

#[cfg(feature = "mock")]
fn create_mock() -> AnyhowResult<Arc<dyn TextRecognizer>> {
    Ok(Arc::new(lector_core::mock::MockRecognizer::default()))
}

#[cfg(not(feature = "mock"))]
fn create_mock() -> AnyhowResult<Arc<dyn TextRecognizer>> {
    Err(anyhow!(
        "the mock engine requires building with the `mock` feature"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tesseract_is_default() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());

        let engine = config.create_recognizer().unwrap();
        assert_eq!(engine.name(), "tesseract");
    }

    #[test]
    fn tesseract_settings_are_forwarded() {
        let config = EngineConfig {
            tessdata_prefix: Some("/usr/share/tessdata".into()),
            tesseract_psm: Some(6),
            ..Default::default()
        };

        let tesseract = config.tesseract_config();
        assert_eq!(
            tesseract.tessdata_prefix(),
            Some(std::path::Path::new("/usr/share/tessdata"))
        );
        assert_eq!(tesseract.page_segmentation_mode(), Some(6));
        assert_eq!(tesseract.engine_mode(), None);
    }

    #[test]
    fn paddle_requires_url() {
        let config = EngineConfig {
            engine: EngineKind::Paddle,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(config.create_recognizer().is_err());
    }

    #[test]
    fn paddle_engine_is_built() {
        let config = EngineConfig {
            engine: EngineKind::Paddle,
            paddle_url: Some("http://localhost:8080".to_owned()),
            paddle_api_key: Some("secret".to_owned()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let engine = config.create_recognizer().unwrap();
        assert_eq!(engine.name(), "paddle");
    }
}
