//! Raw handshake transcript produced by the TLS client invocation

/// Why a handshake invocation did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    None,
    Timeout,
    ConnectionFailed,
    Other,
}

/// Output of one external TLS client run.
///
/// Ownership passes straight to the parser; nothing retains it.
#[derive(Debug, Clone)]
pub struct RawHandshakeResult {
    pub succeeded: bool,
    /// Combined diagnostic output of the client
    pub text: String,
    pub elapsed_ms: u64,
    pub failure_kind: FailureKind,
    /// Failure detail kept for diagnostics, never shown as the primary message
    pub detail: Option<String>,
    /// The timeout bound that fired, in seconds
    pub timeout_secs: Option<u64>,
}

impl RawHandshakeResult {
    pub fn success(text: String, elapsed_ms: u64) -> Self {
        Self {
            succeeded: true,
            text,
            elapsed_ms,
            failure_kind: FailureKind::None,
            detail: None,
            timeout_secs: None,
        }
    }

    pub fn timed_out(text: String, elapsed_ms: u64, timeout_secs: u64) -> Self {
        Self {
            succeeded: false,
            text,
            elapsed_ms,
            failure_kind: FailureKind::Timeout,
            detail: Some(format!("no response within {}s", timeout_secs)),
            timeout_secs: Some(timeout_secs),
        }
    }

    pub fn failed(kind: FailureKind, text: String, elapsed_ms: u64, detail: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            text,
            elapsed_ms,
            failure_kind: kind,
            detail: Some(detail.into()),
            timeout_secs: None,
        }
    }
}
