use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::RecognitionResult;

/// Result of running the pipeline for one image.
///
/// Serializes as either
/// `{"success":true,"data":{...result,"processingTimeMs":n}}` or
/// `{"success":false,"error":"...","processingTimeMs":n}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Recognition succeeded.
    Success {
        /// Recognized text and image dimensions.
        data: RecognitionResult,
        /// Wall-clock time spent on this image.
        processing_time_ms: u64,
    },
    /// A stage failed.
    Failure {
        /// Client-facing error message.
        error: String,
        /// Wall-clock time spent on this image.
        processing_time_ms: u64,
    },
}

impl Outcome {
    /// Creates a success outcome.
    pub fn success(data: RecognitionResult, processing_time_ms: u64) -> Self {
        Self::Success {
            data,
            processing_time_ms,
        }
    }

    /// Creates a failure outcome.
    pub fn failure(error: impl Into<String>, processing_time_ms: u64) -> Self {
        Self::Failure {
            error: error.into(),
            processing_time_ms,
        }
    }

    /// Returns `true` for a success outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the recognition result of a success outcome.
    pub fn data(&self) -> Option<&RecognitionResult> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the error message of a failure outcome.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Wall-clock time spent on this image.
    pub fn processing_time_ms(&self) -> u64 {
        match self {
            Self::Success {
                processing_time_ms, ..
            }
            | Self::Failure {
                processing_time_ms, ..
            } => *processing_time_ms,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TimedResult<'a> {
    #[serde(flatten)]
    result: &'a RecognitionResult,
    processing_time_ms: u64,
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success {
                data,
                processing_time_ms,
            } => {
                let mut state = serializer.serialize_struct("Outcome", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field(
                    "data",
                    &TimedResult {
                        result: data,
                        processing_time_ms: *processing_time_ms,
                    },
                )?;
                state.end()
            }
            Self::Failure {
                error,
                processing_time_ms,
            } => {
                let mut state = serializer.serialize_struct("Outcome", 3)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.serialize_field("processingTimeMs", processing_time_ms)?;
                state.end()
            }
        }
    }
}

/// Ordered outcomes of a batch together with the total wall-clock time.
///
/// Serializes as `{"success":true,"data":[...],"totalProcessingTimeMs":n}`;
/// `success` is always `true` because item failures live in `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEnvelope {
    /// One outcome per input, in input order.
    pub outcomes: Vec<Outcome>,
    /// Wall-clock time for the whole batch.
    pub total_processing_time_ms: u64,
}

impl Serialize for BatchEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BatchEnvelope", 3)?;
        state.serialize_field("success", &true)?;
        state.serialize_field("data", &self.outcomes)?;
        state.serialize_field("totalProcessingTimeMs", &self.total_processing_time_ms)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_flattens_result() {
        let outcome = Outcome::success(
            RecognitionResult {
                width: 10,
                height: 10,
                content: String::new(),
                confidence: 0.0,
            },
            12,
        );

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "success": true,
                "data": {
                    "width": 10,
                    "height": 10,
                    "content": "",
                    "confidence": 0.0,
                    "processingTimeMs": 12
                }
            })
        );
    }

    #[test]
    fn failure_carries_message_and_timing() {
        let outcome = Outcome::failure("Domain not allowed", 3);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({ "success": false, "error": "Domain not allowed", "processingTimeMs": 3 })
        );
        assert_eq!(outcome.error(), Some("Domain not allowed"));
        assert_eq!(outcome.processing_time_ms(), 3);
    }

    #[test]
    fn empty_batch_envelope() {
        let envelope = BatchEnvelope {
            outcomes: Vec::new(),
            total_processing_time_ms: 0,
        };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "success": true, "data": [], "totalProcessingTimeMs": 0 })
        );
    }
}
