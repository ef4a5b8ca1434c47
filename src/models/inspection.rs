//! Inspection verdicts and the final per-target result

use super::{CertificateDetails, InspectionTarget, ParsedCertificate, TargetId};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health of an inspected certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Valid,
    Warning,
    Expired,
    Error,
}

impl HealthStatus {
    /// Get the icon for this status
    pub fn icon(&self) -> &'static str {
        match self {
            HealthStatus::Valid => "✓",
            HealthStatus::Warning => "!",
            HealthStatus::Expired => "✗",
            HealthStatus::Error => "✗",
        }
    }

    /// Whether this status should be surfaced as an issue
    pub fn is_issue(&self) -> bool {
        !matches!(self, HealthStatus::Valid)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Valid => write!(f, "Valid"),
            HealthStatus::Warning => write!(f, "Warning"),
            HealthStatus::Expired => write!(f, "Expired"),
            HealthStatus::Error => write!(f, "Error"),
        }
    }
}

/// Outcome of classifying a parsed certificate at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: HealthStatus,
    pub message: String,
    /// Ceiling of the remaining lifetime in days; `None` when dates were unusable
    pub days_until_expiry: Option<i64>,
    pub is_expired: bool,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
}

impl Verdict {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.into(),
            days_until_expiry: None,
            is_expired: false,
            not_before: None,
            not_after: None,
        }
    }
}

/// Final, immutable result for one dispatched target
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResult {
    pub id: TargetId,
    pub hostname: String,
    pub port: u16,
    pub status: HealthStatus,
    pub message: String,
    pub connected: bool,
    /// Wall-clock time of the handshake invocation
    #[serde(rename = "responseTime")]
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateDetails>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl InspectionResult {
    /// Terminal error row for a target whose pipeline stopped early
    pub fn failure(
        target: &InspectionTarget,
        message: impl Into<String>,
        response_time_ms: u64,
        error_details: Option<String>,
    ) -> Self {
        Self {
            id: target.id.clone(),
            hostname: target.hostname.clone(),
            port: target.port,
            status: HealthStatus::Error,
            message: message.into(),
            connected: false,
            response_time_ms,
            protocol: None,
            cipher: None,
            certificate: None,
            timestamp: now_timestamp(),
            error_details,
        }
    }

    /// Row for a target whose transcript parsed into a certificate
    pub fn from_verdict(
        target: &InspectionTarget,
        parsed: &ParsedCertificate,
        verdict: Verdict,
        response_time_ms: u64,
    ) -> Self {
        let Some(days) = verdict.days_until_expiry else {
            return Self::failure(target, verdict.message, response_time_ms, None);
        };

        Self {
            id: target.id.clone(),
            hostname: target.hostname.clone(),
            port: target.port,
            status: verdict.status,
            message: verdict.message,
            connected: true,
            response_time_ms,
            protocol: Some(parsed.protocol_or_unknown()),
            cipher: Some(parsed.cipher_or_unknown()),
            certificate: Some(CertificateDetails::new(parsed, days, verdict.is_expired)),
            timestamp: now_timestamp(),
            error_details: None,
        }
    }

    pub fn address(&self) -> String {
        InspectionTarget::new(self.id.clone(), self.hostname.clone(), self.port).address()
    }
}

/// RFC 3339 timestamp with millisecond precision and a `Z` suffix
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
