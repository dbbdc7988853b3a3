//! Tesseract process client module.

mod ts_client;
mod ts_config;
mod ts_recognizer;

pub use ts_client::TsClient;
pub use ts_config::TsConfig;
