//! OpenSSL `s_client` transcript parser
//!
//! Turns the free-form diagnostic output of a single handshake into a
//! [`ParsedCertificate`]. Both the OpenSSL 3 dialect (chain entries carrying
//! `a:PKEY:` and `v:NotBefore: ...; NotAfter: ...` lines) and the older
//! dialect (dates printed as separate `notBefore=` / `notAfter=` lines) are
//! understood; when both are present the combined `v:` line wins.
//!
//! Every extractor is a plain function over the whole transcript so each
//! rule can be exercised on its own. All of them return the first match,
//! which for chain-related fields is the leaf certificate.

use crate::models::{ParsedCertificate, UNKNOWN};
use crate::utils::CertificateError;
use regex::Regex;
use std::sync::OnceLock;

/// Substrings that mean the TCP connection itself never came up
pub const CONNECTION_FAILURE_MARKERS: [&str; 3] = [
    "Connection refused",
    "Network is unreachable",
    "Name or service not known",
];

/// At least one of these must be present for a certificate to have been sent
const CERTIFICATE_MARKERS: [&str; 2] = ["Server certificate", "Certificate chain"];

const SELF_SIGNED_IN_CHAIN: &str = "self-signed certificate in certificate chain";

struct Patterns {
    subject: Regex,
    issuer: Regex,
    validity: Regex,
    legacy_not_before: Regex,
    legacy_not_after: Regex,
    protocol: Regex,
    cipher: Regex,
    depth: Regex,
    serial: Regex,
    pkey_size: Regex,
    server_key_size: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid transcript pattern")
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        subject: compile(r"(?m)^[ \t]*0[ \t]+s:([^\r\n]+)"),
        issuer: compile(r"(?m)^[ \t]*0[ \t]+s:[^\r\n]*\r?\n[ \t]*i:([^\r\n]+)"),
        validity: compile(r"v:NotBefore:\s*([^;\r\n]+?GMT);\s*NotAfter:\s*([^;\r\n]+?GMT)"),
        legacy_not_before: compile(r"notBefore=([^\r\n]+)"),
        legacy_not_after: compile(r"notAfter=([^\r\n]+)"),
        protocol: compile(r"(?i)Protocol[ \t]*:[ \t]*([^\r\n]+)"),
        cipher: compile(r"(?i)Cipher[ \t]*:[ \t]*([^\r\n]+)"),
        depth: compile(r"depth=(\d+)"),
        serial: compile(r"(?i)serial[:=][ \t]*([^\r\n]+)"),
        pkey_size: compile(r"PKEY:[ \t]*[^,\r\n]+,[ \t]*(\d+)[ \t]*\(bit\)"),
        server_key_size: compile(r"Server public key is (\d+) bit"),
    })
}

/// First capture group of the first match, trimmed; empty captures count as absent
fn capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Whether the transcript reports that the connection could not be made
pub fn has_connection_failure(text: &str) -> bool {
    CONNECTION_FAILURE_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}

/// Whether the server presented any certificate at all
pub fn has_certificate(text: &str) -> bool {
    CERTIFICATE_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Leaf subject from the ` 0 s:` chain entry
pub fn extract_subject(text: &str) -> Option<String> {
    capture(&patterns().subject, text)
}

/// Leaf issuer from the `i:` line directly below the ` 0 s:` entry
pub fn extract_issuer(text: &str) -> Option<String> {
    capture(&patterns().issuer, text)
}

/// `(notBefore, notAfter)` as printed by the client.
///
/// The combined `v:` line is authoritative; the separate assignment lines are
/// only consulted when it is missing.
pub fn extract_validity(text: &str) -> (Option<String>, Option<String>) {
    let p = patterns();
    if let Some(caps) = p.validity.captures(text) {
        let field = |i: usize| caps.get(i).map(|m| m.as_str().trim().to_string());
        return (field(1), field(2));
    }
    (
        capture(&p.legacy_not_before, text),
        capture(&p.legacy_not_after, text),
    )
}

pub fn extract_protocol(text: &str) -> Option<String> {
    capture(&patterns().protocol, text)
}

pub fn extract_cipher(text: &str) -> Option<String> {
    capture(&patterns().cipher, text)
}

/// First `depth=N` reported by the verify callback, 0 when absent
pub fn extract_chain_depth(text: &str) -> u32 {
    capture(&patterns().depth, text)
        .and_then(|depth| depth.parse().ok())
        .unwrap_or(0)
}

/// Verify errors and self-signed certificates both count as warnings
pub fn has_verify_warning(text: &str) -> bool {
    text.contains("verify error") || text.contains("self-signed certificate")
}

pub fn verify_detail(text: &str) -> String {
    if text.contains(SELF_SIGNED_IN_CHAIN) {
        "Self-signed certificate in chain".to_string()
    } else if text.contains("verify return:1") {
        "Certificate accepted with warnings".to_string()
    } else {
        UNKNOWN.to_string()
    }
}

pub fn extract_serial(text: &str) -> Option<String> {
    capture(&patterns().serial, text)
}

/// Leaf key size from `a:PKEY: <alg>, <N> (bit)`, falling back to the
/// `Server public key is <N> bit` summary line of older clients
pub fn extract_key_size(text: &str) -> Option<u32> {
    let p = patterns();
    capture(&p.pkey_size, text)
        .or_else(|| capture(&p.server_key_size, text))
        .and_then(|bits| bits.parse().ok())
}

/// Parse a full handshake transcript.
///
/// The checks run in a fixed order: a connection failure is never reported
/// as a missing certificate, and a missing certificate is never reported as
/// unparseable dates.
pub fn parse_transcript(text: &str) -> Result<ParsedCertificate, CertificateError> {
    if has_connection_failure(text) {
        return Err(CertificateError::ConnectionFailed);
    }
    if !has_certificate(text) {
        return Err(CertificateError::NoCertificate);
    }

    let (not_before, not_after) = extract_validity(text);
    if not_after.is_none() {
        return Err(CertificateError::MissingDates);
    }

    Ok(ParsedCertificate {
        subject: extract_subject(text),
        issuer: extract_issuer(text),
        not_before,
        not_after,
        protocol: extract_protocol(text),
        cipher: extract_cipher(text),
        chain_depth: extract_chain_depth(text),
        has_verify_warning: has_verify_warning(text),
        verify_detail: verify_detail(text),
        serial_number: extract_serial(text),
        key_size_bits: extract_key_size(text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPENSSL3: &str = "depth=2 C = US, O = Google Trust Services LLC, CN = GTS Root R1
verify return:1
depth=1 C = US, O = Google Trust Services, CN = WR2
verify return:1
depth=0 CN = *.google.com
verify return:1
CONNECTED(00000003)
---
Certificate chain
 0 s:CN = *.google.com
   i:C = US, O = Google Trust Services, CN = WR2
   a:PKEY: id-ecPublicKey, 256 (bit); sigalg: RSA-SHA256
   v:NotBefore: Aug 18 08:39:58 2025 GMT; NotAfter: Nov 10 08:39:57 2025 GMT
 1 s:C = US, O = Google Trust Services, CN = WR2
   i:C = US, O = Google Trust Services LLC, CN = GTS Root R1
   a:PKEY: rsaEncryption, 2048 (bit); sigalg: RSA-SHA256
   v:NotBefore: Dec 13 09:00:00 2023 GMT; NotAfter: Feb 20 14:00:00 2029 GMT
---
Server certificate
-----BEGIN CERTIFICATE-----
MIIEVzCCAz+gAwIBAgIQYVTaH2zB0X4KAAAAAEe1ZTANBgkqhkiG9w0BAQsFADA7
-----END CERTIFICATE-----
subject=CN = *.google.com
issuer=C = US, O = Google Trust Services, CN = WR2
---
Server public key is 256 bit
New, TLSv1.3, Cipher is TLS_AES_256_GCM_SHA384
---
SSL-Session:
    Protocol  : TLSv1.3
    Cipher    : TLS_AES_256_GCM_SHA384
    Verify return code: 0 (ok)
---
DONE
";

    #[test]
    fn test_openssl3_leaf_fields() {
        let parsed = parse_transcript(OPENSSL3).unwrap();
        assert_eq!(parsed.subject.as_deref(), Some("CN = *.google.com"));
        assert_eq!(
            parsed.issuer.as_deref(),
            Some("C = US, O = Google Trust Services, CN = WR2")
        );
        assert_eq!(parsed.not_before.as_deref(), Some("Aug 18 08:39:58 2025 GMT"));
        assert_eq!(parsed.not_after.as_deref(), Some("Nov 10 08:39:57 2025 GMT"));
        assert_eq!(parsed.protocol.as_deref(), Some("TLSv1.3"));
        assert_eq!(parsed.cipher.as_deref(), Some("TLS_AES_256_GCM_SHA384"));
        assert_eq!(parsed.chain_depth, 2);
        assert_eq!(parsed.key_size_bits, Some(256));
        assert!(!parsed.has_verify_warning);
        assert_eq!(parsed.verify_detail, "Certificate accepted with warnings");
        assert_eq!(parsed.serial_number, None);
    }

    #[test]
    fn test_connection_failure_beats_certificate_block() {
        let text = format!("connect: Connection refused\n{}", OPENSSL3);
        assert_eq!(parse_transcript(&text), Err(CertificateError::ConnectionFailed));
    }

    #[test]
    fn test_each_connection_marker() {
        for marker in CONNECTION_FAILURE_MARKERS {
            let text = format!("40E7:error:8000006F:system library:BIO_connect:{}", marker);
            assert_eq!(parse_transcript(&text), Err(CertificateError::ConnectionFailed));
        }
    }

    #[test]
    fn test_no_certificate_beats_missing_dates() {
        let text = "CONNECTED(00000003)\nwrite:errno=104\nno peer certificate available\n";
        assert_eq!(parse_transcript(text), Err(CertificateError::NoCertificate));
    }

    #[test]
    fn test_certificate_without_dates() {
        let text = "Certificate chain\n 0 s:CN = example.com\n   i:CN = Example CA\n---\n";
        assert_eq!(parse_transcript(text), Err(CertificateError::MissingDates));
    }

    #[test]
    fn test_combined_line_wins_over_legacy_lines() {
        let text = "Certificate chain
 0 s:CN = example.com
   i:CN = Example CA
   v:NotBefore: Jan  1 00:00:00 2024 GMT; NotAfter: Jan  1 00:00:00 2099 GMT
notBefore=Feb  2 00:00:00 2020 GMT
notAfter=Feb  2 00:00:00 2021 GMT
";
        let (before, after) = extract_validity(text);
        assert_eq!(before.as_deref(), Some("Jan  1 00:00:00 2024 GMT"));
        assert_eq!(after.as_deref(), Some("Jan  1 00:00:00 2099 GMT"));
    }

    #[test]
    fn test_legacy_date_lines() {
        let text = "Server certificate\nnotBefore=Feb  2 00:00:00 2020 GMT\nnotAfter=Feb  2 00:00:00 2030 GMT\n";
        let parsed = parse_transcript(text).unwrap();
        assert_eq!(parsed.not_before.as_deref(), Some("Feb  2 00:00:00 2020 GMT"));
        assert_eq!(parsed.not_after.as_deref(), Some("Feb  2 00:00:00 2030 GMT"));
        assert_eq!(parsed.subject, None);
    }

    #[test]
    fn test_issuer_requires_line_after_leaf() {
        let text = " 1 s:CN = Intermediate\n   i:CN = Root\n";
        assert_eq!(extract_subject(text), None);
        assert_eq!(extract_issuer(text), None);
    }

    #[test]
    fn test_crlf_transcript() {
        let text = "Certificate chain\r\n 0 s:CN = example.com\r\n   i:CN = Example CA\r\n";
        assert_eq!(extract_subject(text).as_deref(), Some("CN = example.com"));
        assert_eq!(extract_issuer(text).as_deref(), Some("CN = Example CA"));
    }

    #[test]
    fn test_protocol_and_cipher_are_case_insensitive() {
        let text = "PROTOCOL: TLSv1.2\ncipher : ECDHE-RSA-AES128-GCM-SHA256\n";
        assert_eq!(extract_protocol(text).as_deref(), Some("TLSv1.2"));
        assert_eq!(extract_cipher(text).as_deref(), Some("ECDHE-RSA-AES128-GCM-SHA256"));
    }

    #[test]
    fn test_cipher_summary_line_is_not_a_field() {
        assert_eq!(extract_cipher("New, TLSv1.3, Cipher is TLS_AES_128_GCM_SHA256\n"), None);
    }

    #[test]
    fn test_verify_detail_precedence() {
        let text = "depth=1 CN = Root\nverify error:num=19:self-signed certificate in certificate chain\nverify return:1\n";
        assert!(has_verify_warning(text));
        assert_eq!(verify_detail(text), "Self-signed certificate in chain");
        assert_eq!(verify_detail("verify return:1\n"), "Certificate accepted with warnings");
        assert_eq!(verify_detail("nothing here"), UNKNOWN);
    }

    #[test]
    fn test_self_signed_leaf_is_a_warning() {
        let text = "depth=0 CN = localhost\nverify error:num=18:self-signed certificate\n";
        assert!(has_verify_warning(text));
        assert_eq!(verify_detail(text), UNKNOWN);
    }

    #[test]
    fn test_key_size_fallback() {
        assert_eq!(extract_key_size("Server public key is 4096 bit\n"), Some(4096));
        assert_eq!(extract_key_size("a:PKEY: rsaEncryption, 2048 (bit)\nServer public key is 4096 bit"), Some(2048));
        assert_eq!(extract_key_size("no key here"), None);
    }

    #[test]
    fn test_serial_field() {
        assert_eq!(extract_serial("serial=0A1B2C\n").as_deref(), Some("0A1B2C"));
        assert_eq!(extract_serial("Serial: 04:AB\n").as_deref(), Some("04:AB"));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        assert_eq!(parse_transcript(OPENSSL3), parse_transcript(OPENSSL3));
    }
}
