//! Check modules for cert-health
//!
//! The certificate pipeline (handshake, transcript parsing, classification)
//! and the HTTP liveness prober.

pub mod handshake;
pub mod http;
pub mod parser;
pub mod verdict;

pub use handshake::{detect_version, HandshakeInvoker, OpensslInvoker};
pub use http::HttpProber;
pub use parser::parse_transcript;
pub use verdict::{classify, classify_with_threshold, parse_openssl_date, EXPIRY_WARNING_DAYS};
