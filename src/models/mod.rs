//! Data models for cert-health
//!
//! This module contains all the data structures used throughout the application.

pub mod certificate;
pub mod handshake;
pub mod inspection;
pub mod probe;
pub mod target;

pub use certificate::{CertificateDetails, ParsedCertificate, NOT_AVAILABLE, UNKNOWN};
pub use handshake::{FailureKind, RawHandshakeResult};
pub use inspection::{now_timestamp, HealthStatus, InspectionResult, Verdict};
pub use probe::{ProbeHeaders, ProbeResult, ProbeStatus};
pub use target::{InspectionTarget, TargetId, TargetRequest, DEFAULT_TLS_PORT};
