//! Text recognition.
//!
//! [`TextRecognizer`] is the port implemented by every engine backend.
//! [`RecognitionAdapter`] sits in front of it, validating the language,
//! wiring up progress reporting, and bounding each call with a timeout.

mod adapter;
mod engine;
mod options;

use serde::{Deserialize, Serialize};

pub use self::adapter::RecognitionAdapter;
pub use self::engine::{EngineOutput, EngineRequest, ProgressEvent, ProgressReporter, TextRecognizer};
pub use self::options::{RecognitionMode, RecognitionOptions};

/// Text recognized in one image, together with the image dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    /// Width of the canonical image in pixels.
    pub width: u32,
    /// Height of the canonical image in pixels.
    pub height: u32,
    /// Recognized text; may be empty.
    pub content: String,
    /// Engine confidence on a 0 to 100 scale.
    pub confidence: f64,
}
