//! Custom error types for cert-health
//!
//! This module defines domain-specific error types using `thiserror` for
//! the failure modes of certificate inspection, probing, configuration,
//! reporting and the API server.

use thiserror::Error;

/// Top-level error type for the cert-health application
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Certificate error: {0}")]
    Certificate(#[from] CertificateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Report generation error: {0}")]
    Report(#[from] ReportError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a handshake transcript could not be turned into a certificate.
///
/// The display strings are the user-facing messages of the resulting
/// inspection rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CertificateError {
    #[error("Connection failed")]
    ConnectionFailed,

    #[error("No certificate found")]
    NoCertificate,

    #[error("Could not parse certificate dates")]
    MissingDates,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// HTTP liveness probe errors
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

/// Report generation errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report to {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("Failed to serialize report: {message}")]
    Serialize { message: String },
}

/// API server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },

    #[error("Server terminated: {message}")]
    Serve { message: String },
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;
