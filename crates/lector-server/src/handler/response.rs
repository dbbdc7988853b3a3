use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failure envelope returned for request-level errors.
///
/// Serializes as `{"success":false,"error":"...","processingTimeMs":n}`,
/// the same shape a failed recognition produces.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse<'a> {
    /// Always `false`.
    pub success: bool,
    /// Message safe for client display.
    #[serde(rename = "error")]
    pub message: Cow<'a, str>,
    /// Time spent on the request before it failed.
    pub processing_time_ms: u64,

    /// The error name/type identifier.
    #[serde(skip)]
    pub name: Cow<'a, str>,
    /// Internal context for debugging, never sent to the client.
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code.
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "Invalid request data",
        StatusCode::BAD_REQUEST,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Internal server error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const NOT_FOUND: Self = Self::new("not_found", "Not found", StatusCode::NOT_FOUND);
    pub const PAYLOAD_TOO_LARGE: Self = Self::new(
        "payload_too_large",
        "Request body too large",
        StatusCode::PAYLOAD_TOO_LARGE,
    );
    pub const SERVICE_UNAVAILABLE: Self = Self::new(
        "service_unavailable",
        "Service unavailable",
        StatusCode::SERVICE_UNAVAILABLE,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            success: false,
            message: Cow::Borrowed(message),
            processing_time_ms: 0,
            name: Cow::Borrowed(name),
            context: None,
            status,
        }
    }

    /// Replaces the client-facing message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches internal context.
    #[inline]
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the reported processing time.
    #[inline]
    pub fn with_processing_time(mut self, processing_time_ms: u64) -> Self {
        self.processing_time_ms = processing_time_ms;
        self
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        if let Some(context) = self.context.as_deref() {
            tracing::debug!(
                target: crate::TRACING_TARGET_HANDLER,
                name = %self.name,
                status = self.status.as_u16(),
                context = context,
                "request failed"
            );
        }

        (self.status, Json(self)).into_response()
    }
}
