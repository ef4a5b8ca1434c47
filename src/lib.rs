//! cert-health library
//!
//! Endpoint liveness and TLS certificate health checking:
//! - Certificate inspection through the OpenSSL command-line client
//! - Transcript parsing for both OpenSSL output dialects
//! - Expiry and verification classification
//! - Bounded, order-preserving batch inspection
//! - HTTP liveness probing
//! - A JSON API server and text/JSON reports
//!
//! # Usage
//!
//! ```rust,ignore
//! use cert_health::checks::OpensslInvoker;
//! use cert_health::config::Settings;
//! use cert_health::models::TargetRequest;
//! use cert_health::runner::{run_batch, BatchOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = Settings::default();
//!     let invoker = OpensslInvoker::new(&settings.inspection);
//!     let requests = vec![TargetRequest::from_spec("example.com")];
//!     let results = run_batch(&invoker, &requests, &BatchOptions::default()).await;
//!     // Process results...
//! }
//! ```

pub mod checks;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod output;
pub mod runner;
pub mod server;
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Settings;
pub use models::{HealthStatus, InspectionResult, InspectionTarget, TargetRequest};
pub use utils::{Result, ToolkitError};
