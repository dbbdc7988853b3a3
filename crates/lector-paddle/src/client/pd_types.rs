//! Wire types of the PaddleX OCR pipeline.

use serde::{Deserialize, Serialize};

/// File type marker for single images.
pub(crate) const FILE_TYPE_IMAGE: u8 = 1;

/// Request body of `POST /ocr`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OcrRequest<'a> {
    /// Base64 encoded image.
    pub file: &'a str,
    /// `1` for images.
    pub file_type: u8,
}

/// Envelope wrapping every PaddleX response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiResponse<T> {
    #[serde(default)]
    pub log_id: Option<String>,
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
    #[serde(default)]
    pub result: Option<T>,
}

/// Result of `POST /ocr`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrOutput {
    /// One entry per page; a single image has one page.
    #[serde(default)]
    pub ocr_results: Vec<OcrPage>,
}

/// Recognized lines of one page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrPage {
    /// Lines that survived score filtering.
    #[serde(default)]
    pub pruned_result: PrunedResult,
}

/// Recognized line texts with their scores.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrunedResult {
    /// Line texts in reading order.
    #[serde(default)]
    pub rec_texts: Vec<String>,
    /// Line scores in `0.0..=1.0`.
    #[serde(default)]
    pub rec_scores: Vec<f64>,
}

impl OcrOutput {
    /// All recognized lines joined with newlines.
    pub fn text(&self) -> String {
        self.ocr_results
            .iter()
            .flat_map(|page| page.pruned_result.rec_texts.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Mean line score on a 0 to 100 scale, or zero without lines.
    pub fn confidence(&self) -> f64 {
        let scores: Vec<f64> = self
            .ocr_results
            .iter()
            .flat_map(|page| page.pruned_result.rec_scores.iter().copied())
            .collect();

        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pipeline_response() {
        let body = r#"{
            "logId": "abc",
            "errorCode": 0,
            "errorMsg": "Success",
            "result": {
                "ocrResults": [{
                    "prunedResult": {
                        "rec_texts": ["Hello", "World"],
                        "rec_scores": [0.9, 0.7],
                        "rec_boxes": [[0, 0, 10, 10], [0, 12, 10, 22]]
                    },
                    "ocrImage": null
                }],
                "dataInfo": { "width": 10, "height": 22, "type": "image" }
            }
        }"#;

        let response: ApiResponse<OcrOutput> = serde_json::from_str(body).unwrap();
        assert_eq!(response.error_code, 0);

        let output = response.result.unwrap();
        assert_eq!(output.text(), "Hello\nWorld");
        assert!((output.confidence() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn empty_result_has_zero_confidence() {
        let output = OcrOutput::default();
        assert_eq!(output.text(), "");
        assert_eq!(output.confidence(), 0.0);
    }

    #[test]
    fn parses_error_envelope() {
        let body = r#"{"logId":"x","errorCode":422,"errorMsg":"Invalid file"}"#;
        let response: ApiResponse<OcrOutput> = serde_json::from_str(body).unwrap();
        assert_eq!(response.error_code, 422);
        assert!(response.result.is_none());
    }
}
