//! Utility modules for cert-health
//!
//! This module contains error types, progress indicators, and other utilities.

pub mod error;
pub mod progress;

pub use error::{
    CertificateError, ConfigError, ProbeError, ReportError, Result, ServerError, ToolkitError,
};
