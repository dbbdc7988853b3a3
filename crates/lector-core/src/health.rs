//! Health reporting for recognition engines.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Operational status of a recognition engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Engine is operating normally.
    #[default]
    Healthy,
    /// Engine cannot serve requests.
    Unhealthy,
}

/// Health information for a recognition engine.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Current status.
    pub status: ServiceStatus,
    /// How long the check took.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Duration>,
    /// Optional description of the current state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceHealth {
    /// Creates a healthy report.
    pub fn healthy() -> Self {
        Self::default()
    }

    /// Creates an unhealthy report with a message.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Unhealthy,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Sets the measured response time.
    pub fn with_response_time(mut self, response: Duration) -> Self {
        self.response = Some(response);
        self
    }

    /// Returns `true` if the engine can serve requests.
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}
