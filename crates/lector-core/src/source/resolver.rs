//! Source resolver and its HTTP fetch path.

use std::fmt;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use reqwest::Client;
use reqwest::redirect::{Attempt, Policy};
use url::Url;

use super::base64::decode_lenient;
use super::{AllowList, ImageSource, IntoImageSource, SourceError};
use crate::TRACING_TARGET_SOURCE;

/// Maximum number of redirects followed for a single fetch.
const MAX_REDIRECTS: usize = 5;

/// Configuration for a [`SourceResolver`].
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Hosts that remote images may be fetched from.
    pub allow_list: AllowList,
    /// Upper bound on a whole remote fetch, including the body.
    pub fetch_timeout: Duration,
    /// Largest accepted remote body in bytes.
    pub max_image_size: usize,
    /// User agent sent with remote fetches.
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            allow_list: AllowList::new([AllowList::DEFAULT_HOST]),
            fetch_timeout: Duration::from_secs(30),
            max_image_size: 24 * 1024 * 1024,
            user_agent: concat!("lector/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Turns an image source into encoded image bytes.
///
/// Remote fetches go only to hosts on the allow-list, including every
/// redirect hop. Base64 input is decoded leniently and inline bytes are
/// passed through untouched; neither is inspected for validity here.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    http_client: Client,
    allow_list: AllowList,
    max_image_size: usize,
}

impl SourceResolver {
    /// Creates a resolver, building its HTTP client.
    pub fn new(config: SourceConfig) -> reqwest::Result<Self> {
        let http_client = Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent)
            .redirect(redirect_policy(config.allow_list.clone()))
            .build()?;

        tracing::debug!(
            target: TRACING_TARGET_SOURCE,
            allowed_domains = ?config.allow_list.hosts(),
            fetch_timeout = ?config.fetch_timeout,
            max_image_size = config.max_image_size,
            "source resolver initialized"
        );

        Ok(Self {
            http_client,
            allow_list: config.allow_list,
            max_image_size: config.max_image_size,
        })
    }

    /// Returns the hosts remote images may be fetched from.
    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Resolves a source into encoded image bytes.
    pub async fn resolve(&self, source: impl IntoImageSource) -> Result<Bytes, SourceError> {
        match source.into_image_source()? {
            ImageSource::Url(url) => self.fetch(url).await,
            ImageSource::Base64(data) => Ok(Bytes::from(decode_lenient(&data))),
            ImageSource::Bytes(data) => Ok(data),
        }
    }

    async fn fetch(&self, url: Url) -> Result<Bytes, SourceError> {
        let host = url.host_str().unwrap_or_default();
        if !self.allow_list.contains(host) {
            tracing::warn!(
                target: TRACING_TARGET_SOURCE,
                host = host,
                "rejected fetch from host outside the allow-list"
            );
            return Err(SourceError::DomainNotAllowed { host: host.into() });
        }

        tracing::debug!(target: TRACING_TARGET_SOURCE, url = %url, "fetching remote image");

        let mut response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let limit = self.max_image_size;
        if let Some(length) = response.content_length()
            && length > limit as u64
        {
            return Err(SourceError::TooLarge { limit });
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(SourceError::Fetch)? {
            if body.len() + chunk.len() > limit {
                return Err(SourceError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(
            target: TRACING_TARGET_SOURCE,
            url = %url,
            size = body.len(),
            "remote image fetched"
        );

        Ok(body.freeze())
    }
}

/// Redirect target rejected by the allow-list.
#[derive(Debug)]
struct RedirectBlocked {
    host: String,
}

impl fmt::Display for RedirectBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "redirect to '{}' is not allowed", self.host)
    }
}

impl std::error::Error for RedirectBlocked {}

fn redirect_policy(allow_list: AllowList) -> Policy {
    Policy::custom(move |attempt: Attempt<'_>| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let host = attempt.url().host_str().unwrap_or_default().to_owned();
        if allow_list.contains(&host) {
            attempt.follow()
        } else {
            attempt.error(RedirectBlocked { host })
        }
    })
}

fn map_send_error(error: reqwest::Error) -> SourceError {
    let mut cause = std::error::Error::source(&error);
    while let Some(inner) = cause {
        if let Some(blocked) = inner.downcast_ref::<RedirectBlocked>() {
            tracing::warn!(
                target: TRACING_TARGET_SOURCE,
                host = %blocked.host,
                "rejected redirect to host outside the allow-list"
            );
            return SourceError::DomainNotAllowed {
                host: blocked.host.clone(),
            };
        }
        cause = inner.source();
    }

    SourceError::Fetch(error)
}
