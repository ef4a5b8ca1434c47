//! Inspection targets and the inbound request shape they are built from

use serde::{Deserialize, Serialize};
use std::fmt;

/// Port used when a target does not name one
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Opaque caller-supplied identifier, echoed back unchanged
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Number(n) => write!(f, "{}", n),
            TargetId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        TargetId::Text(value.to_string())
    }
}

impl From<usize> for TargetId {
    fn from(value: usize) -> Self {
        TargetId::Number(value as i64)
    }
}

/// A single `(hostname, port)` pair to inspect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionTarget {
    pub id: TargetId,
    pub hostname: String,
    pub port: u16,
}

impl InspectionTarget {
    pub fn new(id: impl Into<TargetId>, hostname: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            hostname: hostname.into(),
            port,
        }
    }

    /// Build a target from `host`, `host:port` or an `http(s)://` URL
    pub fn parse(id: impl Into<TargetId>, spec: &str, default_port: u16) -> Option<Self> {
        let (hostname, port) = split_host_spec(spec)?;
        Some(Self::new(id, hostname, port.unwrap_or(default_port)))
    }

    /// `host:port` label used in logs and terminal output
    pub fn address(&self) -> String {
        if self.hostname.contains(':') {
            format!("[{}]:{}", self.hostname, self.port)
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }
}

/// One entry of an inbound batch request.
///
/// The browser client sends `url`; direct API callers may send `hostname`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRequest {
    #[serde(default)]
    pub id: Option<TargetId>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub port: Option<u16>,
}

fn default_enabled() -> bool {
    true
}

impl TargetRequest {
    /// Request for a bare host specification, enabled, with no explicit id
    pub fn from_spec(spec: impl Into<String>) -> Self {
        Self {
            id: None,
            url: Some(spec.into()),
            hostname: None,
            enabled: true,
            port: None,
        }
    }

    /// Convert into a dispatchable target.
    ///
    /// Returns `None` for disabled entries and entries without a usable
    /// hostname; those never enter the pipeline. `position` is the 1-based
    /// index used as id when the request carries none.
    pub fn to_target(&self, position: usize) -> Option<InspectionTarget> {
        if !self.enabled {
            return None;
        }
        let spec = self
            .hostname
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .or(self.url.as_deref())?;
        let (hostname, spec_port) = split_host_spec(spec)?;
        let port = self.port.or(spec_port).unwrap_or(DEFAULT_TLS_PORT);
        let id = self.id.clone().unwrap_or(TargetId::from(position));
        Some(InspectionTarget::new(id, hostname, port))
    }
}

/// Strip scheme, path and an explicit port from a host specification
fn split_host_spec(spec: &str) -> Option<(String, Option<u16>)> {
    let spec = spec.trim();
    let lower = spec.to_ascii_lowercase();
    let rest = if lower.starts_with("https://") {
        &spec[8..]
    } else if lower.starts_with("http://") {
        &spec[7..]
    } else {
        spec
    };

    let authority = rest
        .split(|c: char| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    // Drop userinfo if present
    let authority = authority.rsplit('@').next().unwrap_or(authority);

    let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
        let (host, tail) = bracketed.split_once(']')?;
        let port = tail.strip_prefix(':').and_then(|p| p.parse::<u16>().ok());
        (host, port)
    } else {
        match authority.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => (host, port.parse::<u16>().ok()),
            _ => (authority, None),
        }
    };

    let host = host.trim().trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), port))
}
