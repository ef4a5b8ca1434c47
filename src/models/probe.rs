//! HTTP liveness probe results

use super::TargetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Liveness of an HTTP endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Healthy,
    Warning,
    Error,
}

impl ProbeStatus {
    /// Classify an HTTP status code
    pub fn from_status_code(code: u16) -> Self {
        if code < 400 {
            ProbeStatus::Healthy
        } else if code < 500 {
            ProbeStatus::Warning
        } else {
            ProbeStatus::Error
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Healthy => write!(f, "Healthy"),
            ProbeStatus::Warning => write!(f, "Warning"),
            ProbeStatus::Error => write!(f, "Error"),
        }
    }
}

/// Selected response headers echoed back to the caller
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeHeaders {
    #[serde(rename = "content-type")]
    pub content_type: Option<String>,
    pub server: Option<String>,
    #[serde(rename = "cache-control")]
    pub cache_control: Option<String>,
}

/// Result of one HTTP liveness probe
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub id: TargetId,
    pub url: String,
    pub status: ProbeStatus,
    pub response_time: u64,
    pub status_code: Option<u16>,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<ProbeHeaders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}
