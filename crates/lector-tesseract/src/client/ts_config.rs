//! Configuration for the Tesseract process client.

use std::path::{Path, PathBuf};

/// Configuration for the Tesseract process client.
///
/// # Examples
///
/// ```ignore
/// use lector_tesseract::TsConfig;
///
/// let config = TsConfig::new("/usr/bin/tesseract")
///     .with_tessdata_prefix("/usr/share/tessdata");
/// ```
#[derive(Debug, Clone)]
pub struct TsConfig {
    /// Path or name of the tesseract binary
    binary: PathBuf,

    /// Directory containing `*.traineddata` files
    tessdata_prefix: Option<PathBuf>,

    /// OCR engine mode passed as `--oem`
    engine_mode: Option<u8>,

    /// Page segmentation mode passed as `--psm`
    page_segmentation_mode: Option<u8>,
}

impl TsConfig {
    /// Binary name resolved through `PATH` by default.
    pub const DEFAULT_BINARY: &'static str = "tesseract";

    /// Create a new configuration for the given binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            tessdata_prefix: None,
            engine_mode: None,
            page_segmentation_mode: None,
        }
    }

    /// Get the binary path.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Get the tessdata directory (if configured).
    pub fn tessdata_prefix(&self) -> Option<&Path> {
        self.tessdata_prefix.as_deref()
    }

    /// Get the OCR engine mode (if configured).
    pub fn engine_mode(&self) -> Option<u8> {
        self.engine_mode
    }

    /// Get the page segmentation mode (if configured).
    pub fn page_segmentation_mode(&self) -> Option<u8> {
        self.page_segmentation_mode
    }

    /// Set the tessdata directory.
    pub fn with_tessdata_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.tessdata_prefix = Some(prefix.into());
        self
    }

    /// Set the OCR engine mode.
    pub fn with_engine_mode(mut self, mode: u8) -> Self {
        self.engine_mode = Some(mode);
        self
    }

    /// Set the page segmentation mode.
    pub fn with_page_segmentation_mode(mut self, mode: u8) -> Self {
        self.page_segmentation_mode = Some(mode);
        self
    }

    /// Command-line arguments for recognizing stdin in `language`.
    pub(crate) fn recognize_args(&self, language: &str) -> Vec<String> {
        let mut args = vec![
            "stdin".to_owned(),
            "stdout".to_owned(),
            "-l".to_owned(),
            language.to_owned(),
        ];

        if let Some(oem) = self.engine_mode {
            args.extend(["--oem".to_owned(), oem.to_string()]);
        }
        if let Some(psm) = self.page_segmentation_mode {
            args.extend(["--psm".to_owned(), psm.to_string()]);
        }

        args.push("tsv".to_owned());
        args
    }
}

impl Default for TsConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BINARY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TsConfig::default();
        assert_eq!(config.binary(), Path::new("tesseract"));
        assert!(config.tessdata_prefix().is_none());
    }

    #[test]
    fn test_recognize_args() {
        let args = TsConfig::default().recognize_args("deu");
        assert_eq!(args, ["stdin", "stdout", "-l", "deu", "tsv"]);

        let args = TsConfig::default()
            .with_engine_mode(1)
            .with_page_segmentation_mode(6)
            .recognize_args("eng");
        assert_eq!(
            args,
            ["stdin", "stdout", "-l", "eng", "--oem", "1", "--psm", "6", "tsv"]
        );
    }
}
