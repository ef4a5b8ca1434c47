//! Certificate information types

use serde::Serialize;

/// Placeholder rendered for certificate fields the transcript did not carry
pub const NOT_AVAILABLE: &str = "Not available";

/// Placeholder for protocol, cipher, key size and verification detail
pub const UNKNOWN: &str = "Unknown";

/// Certificate fields extracted from a handshake transcript.
///
/// Every field the transcript may omit is an `Option`; a record without
/// `not_after` cannot be classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCertificate {
    /// Leaf certificate subject
    pub subject: Option<String>,
    /// Leaf certificate issuer
    pub issuer: Option<String>,
    /// Raw `notBefore` timestamp as printed by the client
    pub not_before: Option<String>,
    /// Raw `notAfter` timestamp as printed by the client
    pub not_after: Option<String>,
    /// Negotiated protocol version
    pub protocol: Option<String>,
    /// Negotiated cipher suite
    pub cipher: Option<String>,
    /// First `depth=` reported by the verify callback
    pub chain_depth: u32,
    /// The client reported a verify error or a self-signed certificate
    pub has_verify_warning: bool,
    /// Human-readable verification state
    pub verify_detail: String,
    pub serial_number: Option<String>,
    /// Public key size in bits
    pub key_size_bits: Option<u32>,
}

impl ParsedCertificate {
    pub fn protocol_or_unknown(&self) -> String {
        self.protocol.clone().unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn cipher_or_unknown(&self) -> String {
        self.cipher.clone().unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Key size as displayed, e.g. `2048 bit`
    pub fn key_size_display(&self) -> String {
        self.key_size_bits
            .map(|bits| format!("{} bit", bits))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// Certificate block of an inspection result, in its wire/display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDetails {
    pub subject: String,
    pub issuer: String,
    pub valid_from: String,
    pub valid_to: String,
    pub days_until_expiry: i64,
    pub is_expired: bool,
    pub is_verified: bool,
    pub verify_result: String,
    pub chain_depth: u32,
    pub serial_number: String,
    pub key_size: String,
}

impl CertificateDetails {
    pub fn new(parsed: &ParsedCertificate, days_until_expiry: i64, is_expired: bool) -> Self {
        let or_na = |value: &Option<String>| {
            value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        Self {
            subject: or_na(&parsed.subject),
            issuer: or_na(&parsed.issuer),
            valid_from: or_na(&parsed.not_before),
            valid_to: or_na(&parsed.not_after),
            days_until_expiry,
            is_expired,
            is_verified: !parsed.has_verify_warning,
            verify_result: parsed.verify_detail.clone(),
            chain_depth: parsed.chain_depth,
            serial_number: or_na(&parsed.serial_number),
            key_size: parsed.key_size_display(),
        }
    }
}
