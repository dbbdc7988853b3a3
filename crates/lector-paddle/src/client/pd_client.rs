//! PaddleX HTTP client implementation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use url::Url;

use super::pd_types::{ApiResponse, FILE_TYPE_IMAGE, OcrOutput, OcrRequest};
use crate::{Error, PADDLEX_TARGET, PdConfig, Result};

/// HTTP client for a PaddleX OCR pipeline.
///
/// # Examples
///
/// ```ignore
/// use lector_paddle::{PdClient, PdConfig};
///
/// let client = PdClient::new(PdConfig::new("http://localhost:8080")?)?;
/// let output = client.recognize_png(&png_bytes).await?;
/// println!("{}", output.text());
/// ```
#[derive(Debug, Clone)]
pub struct PdClient {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: PdConfig,
}

impl PdClient {
    /// Create a new PaddleX client with the given configuration.
    pub fn new(config: PdConfig) -> Result<Self> {
        let mut client_builder = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent());

        if let Some(api_key) = config.api_key() {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::AUTHORIZATION,
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .map_err(|e| Error::config(format!("Invalid API key: {}", e)))?,
            );
            client_builder = client_builder.default_headers(headers);
        }

        let http_client = client_builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            target: PADDLEX_TARGET,
            base_url = %config.base_url(),
            timeout = ?config.timeout(),
            "PaddleX client initialized"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Get a reference to the client configuration.
    pub fn config(&self) -> &PdConfig {
        &self.config
    }

    /// Recognize text in a PNG image.
    pub async fn recognize_png(&self, png: &[u8]) -> Result<OcrOutput> {
        let url = self.config.endpoint("ocr")?;
        let file = STANDARD.encode(png);

        tracing::debug!(
            target: PADDLEX_TARGET,
            url = %url,
            size = png.len(),
            "Sending image to PaddleX"
        );

        self.execute_with_retry(&url, &file).await
    }

    /// Execute a request with automatic retry on retryable errors.
    async fn execute_with_retry(&self, url: &Url, file: &str) -> Result<OcrOutput> {
        let mut attempt = 0;
        let max_retries = self.config.max_retries();

        loop {
            let body = OcrRequest {
                file,
                file_type: FILE_TYPE_IMAGE,
            };

            let result = async {
                let response = self
                    .http_client
                    .post(url.clone())
                    .json(&body)
                    .send()
                    .await?;

                self.handle_response(response).await
            }
            .await;

            match result {
                Ok(output) => {
                    if attempt > 0 {
                        tracing::info!(
                            target: PADDLEX_TARGET,
                            attempt = attempt + 1,
                            "Request succeeded after retry"
                        );
                    }
                    return Ok(output);
                }
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    let backoff = self.config.retry_backoff() * attempt;

                    tracing::warn!(
                        target: PADDLEX_TARGET,
                        attempt = attempt,
                        max_retries = max_retries,
                        backoff_ms = backoff.as_millis(),
                        error = %e,
                        "Request failed, retrying"
                    );

                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    tracing::error!(
                        target: PADDLEX_TARGET,
                        attempt = attempt + 1,
                        category = e.category(),
                        error = %e,
                        "Request failed permanently"
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Handle HTTP response and convert to result.
    async fn handle_response(&self, response: reqwest::Response) -> Result<OcrOutput> {
        let status = response.status();

        tracing::debug!(
            target: PADDLEX_TARGET,
            status = status.as_u16(),
            "Received response from PaddleX"
        );

        match status {
            StatusCode::TOO_MANY_REQUESTS => return Err(Error::RateLimit),
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                return Err(Error::service_unavailable("Pipeline temporarily unavailable"));
            }
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                return Err(Error::Timeout {
                    timeout: self.config.timeout(),
                });
            }
            _ => {}
        }

        let body = response.text().await?;
        let envelope: ApiResponse<OcrOutput> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(Error::api(status.as_u16(), i64::from(status.as_u16()), body));
            }
            Err(e) => {
                return Err(Error::invalid_response(format!(
                    "Failed to parse response: {}",
                    e
                )));
            }
        };

        if !status.is_success() || envelope.error_code != 0 {
            return Err(Error::api(
                status.as_u16(),
                envelope.error_code,
                envelope.error_msg,
            ));
        }

        tracing::trace!(
            target: PADDLEX_TARGET,
            log_id = envelope.log_id.as_deref().unwrap_or_default(),
            "PaddleX request completed"
        );

        envelope
            .result
            .ok_or_else(|| Error::invalid_response("Response has no result"))
    }

    /// Health check for the PaddleX pipeline server.
    pub async fn health_check(&self) -> Result<()> {
        let url = self.config.endpoint("health")?;

        tracing::debug!(target: PADDLEX_TARGET, url = %url, "Performing health check");

        let response = self.http_client.get(url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::service_unavailable(format!(
                "Health check failed with status {}",
                response.status()
            )))
        }
    }
}
