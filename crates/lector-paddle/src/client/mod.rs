//! PaddleX HTTP client module.

mod pd_client;
mod pd_config;
mod pd_recognizer;
mod pd_types;

pub use pd_client::PdClient;
pub use pd_config::PdConfig;
pub use pd_types::{OcrOutput, OcrPage, PrunedResult};
