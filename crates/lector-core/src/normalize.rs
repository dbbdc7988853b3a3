//! Image normalization.
//!
//! Whatever format the client sent, recognition engines always receive a
//! PNG with known, positive dimensions.

use std::io::Cursor;
use std::num::NonZeroU32;

use bytes::Bytes;
use image::{ImageFormat, ImageReader};
use tokio::task::JoinHandle;

use crate::{NormalizationError, TRACING_TARGET_NORMALIZE};

/// A decoded-and-re-encoded PNG image with known dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalImage {
    data: Bytes,
    width: NonZeroU32,
    height: NonZeroU32,
}

impl CanonicalImage {
    /// PNG encoded pixel data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

/// Decodes arbitrary encoded image bytes into a [`CanonicalImage`].
///
/// Reading the dimensions and re-encoding to PNG run concurrently on the
/// blocking pool; both must succeed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageNormalizer;

impl ImageNormalizer {
    /// Creates a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalizes `raw` into a canonical PNG.
    pub async fn normalize(&self, raw: Bytes) -> Result<CanonicalImage, NormalizationError> {
        let size = raw.len();
        let probe = tokio::task::spawn_blocking({
            let raw = raw.clone();
            move || read_dimensions(&raw)
        });
        let encode = tokio::task::spawn_blocking(move || encode_png(&raw));

        let ((width, height), data) =
            tokio::try_join!(join(probe), join(encode)).inspect_err(|error| {
                tracing::warn!(
                    target: TRACING_TARGET_NORMALIZE,
                    size = size,
                    error = ?error,
                    "failed to normalize image"
                );
            })?;

        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            tracing::warn!(
                target: TRACING_TARGET_NORMALIZE,
                width = width,
                height = height,
                "decoded image has no pixels"
            );
            return Err(NormalizationError::EmptyDimensions { width, height });
        };

        tracing::debug!(
            target: TRACING_TARGET_NORMALIZE,
            width = width,
            height = height,
            input_size = size,
            output_size = data.len(),
            "image normalized"
        );

        Ok(CanonicalImage {
            data,
            width: w,
            height: h,
        })
    }
}

async fn join<T>(
    handle: JoinHandle<Result<T, NormalizationError>>,
) -> Result<T, NormalizationError> {
    handle.await.map_err(NormalizationError::Task)?
}

fn read_dimensions(raw: &[u8]) -> Result<(u32, u32), NormalizationError> {
    ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(NormalizationError::Io)?
        .into_dimensions()
        .map_err(NormalizationError::Codec)
}

fn encode_png(raw: &[u8]) -> Result<Bytes, NormalizationError> {
    let image = ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(NormalizationError::Io)?
        .decode()
        .map_err(NormalizationError::Codec)?;

    let mut output = Cursor::new(Vec::new());
    image
        .write_to(&mut output, ImageFormat::Png)
        .map_err(NormalizationError::Codec)?;

    Ok(Bytes::from(output.into_inner()))
}
