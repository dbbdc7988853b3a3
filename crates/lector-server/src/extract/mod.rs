//! Request extractors that reject with the failure envelope.
//!
//! [`Json`] and [`Query`] wrap the axum extractors and convert their
//! rejections into [`Error`]s, so malformed requests get the same
//! `{"success":false,...}` body as failed recognitions.
//!
//! [`Error`]: crate::handler::Error

mod json;
mod query;

pub use crate::extract::json::Json;
pub use crate::extract::query::Query;

/// Tracing target for extraction failures.
const TRACING_TARGET: &str = "lector_server::extract";

/// Trims a rejection message and strips characters unsafe for log lines.
fn sanitize_error_message(message: &str) -> String {
    const MAX_LEN: usize = 200;

    let cleaned: String = message
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let cleaned = cleaned.trim();

    match cleaned.char_indices().nth(MAX_LEN) {
        Some((index, _)) => format!("{}...", &cleaned[..index]),
        None => cleaned.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_error_message;

    #[test]
    fn strips_control_characters() {
        assert_eq!(sanitize_error_message("bad\nvalue\t"), "bad value");
    }

    #[test]
    fn truncates_long_messages() {
        let message = "x".repeat(500);
        let sanitized = sanitize_error_message(&message);
        assert_eq!(sanitized.len(), 203);
        assert!(sanitized.ends_with("..."));
    }
}
