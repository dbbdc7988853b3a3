//! Image source resolution.
//!
//! A client names an image in one of three ways: a remote URL, a base64
//! string, or an inline byte array. [`RawImageSource`] is the wire form with
//! three optional fields; [`ImageSource`] is the validated form with exactly
//! one variant. [`SourceResolver`] turns either into encoded image bytes.

mod allow_list;
mod base64;
mod resolver;

use serde::{Deserialize, Serialize};
use url::Url;

pub use self::allow_list::AllowList;
pub use self::resolver::{SourceConfig, SourceResolver};
pub use crate::error::SourceError;

/// Image source as it arrives on the wire.
///
/// Exactly one field must be present and non-empty for the source to be
/// valid. Validation happens when it is converted into an [`ImageSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImageSource {
    /// Absolute `http`/`https` URL of a remote image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Base64 encoded image bytes, standard or URL-safe alphabet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    /// Raw image bytes as an array of integers in `0..=255`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<Vec<u8>>,
}

impl RawImageSource {
    /// Creates a source pointing at a remote URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Creates a source from a base64 string.
    pub fn base64(data: impl Into<String>) -> Self {
        Self {
            base64: Some(data.into()),
            ..Default::default()
        }
    }

    /// Creates a source from raw bytes.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(data.into()),
            ..Default::default()
        }
    }
}

/// A validated image source with exactly one origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Remote image, fetched over HTTP(S).
    Url(Url),
    /// Base64 encoded image bytes.
    Base64(String),
    /// Raw image bytes.
    Bytes(bytes::Bytes),
}

impl TryFrom<RawImageSource> for ImageSource {
    type Error = SourceError;

    fn try_from(raw: RawImageSource) -> Result<Self, Self::Error> {
        let url = raw.url.filter(|url| !url.is_empty());
        let base64 = raw.base64.filter(|data| !data.is_empty());
        let bytes = raw.bytes.filter(|data| !data.is_empty());

        match (url, base64, bytes) {
            (Some(url), None, None) => parse_url(&url).map(Self::Url),
            (None, Some(data), None) => Ok(Self::Base64(data)),
            (None, None, Some(data)) => Ok(Self::Bytes(data.into())),
            _ => Err(SourceError::InvalidSource),
        }
    }
}

fn parse_url(input: &str) -> Result<Url, SourceError> {
    let url = Url::parse(input).map_err(|e| SourceError::InvalidUrl {
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(SourceError::InvalidUrl {
            reason: "missing host".into(),
        }),
        scheme => Err(SourceError::InvalidUrl {
            reason: format!("unsupported scheme '{scheme}'"),
        }),
    }
}

/// Conversion into a validated [`ImageSource`].
///
/// Implemented for the wire form, the validated form, and untyped JSON so
/// that a malformed batch element fails as its own item rather than
/// rejecting the whole batch.
pub trait IntoImageSource: Send + 'static {
    /// Validates and converts the value.
    fn into_image_source(self) -> Result<ImageSource, SourceError>;
}

impl IntoImageSource for ImageSource {
    fn into_image_source(self) -> Result<ImageSource, SourceError> {
        Ok(self)
    }
}

impl IntoImageSource for RawImageSource {
    fn into_image_source(self) -> Result<ImageSource, SourceError> {
        ImageSource::try_from(self)
    }
}

impl IntoImageSource for serde_json::Value {
    fn into_image_source(self) -> Result<ImageSource, SourceError> {
        serde_json::from_value::<RawImageSource>(self)
            .map_err(|_| SourceError::InvalidSource)?
            .into_image_source()
    }
}
