use cert_health::checks::parser::{
    extract_chain_depth, extract_key_size, extract_validity, parse_transcript,
};
use cert_health::checks::{classify, parse_openssl_date};
use cert_health::models::HealthStatus;
use cert_health::utils::CertificateError;
use chrono::{Duration, Utc};

/// OpenSSL 1.1 style transcript: dates only as separate lines
const LEGACY: &str = "depth=1 C = US, O = Let's Encrypt, CN = R3
verify return:1
depth=0 CN = legacy.example
verify return:1
CONNECTED(00000003)
---
Certificate chain
 0 s:CN = legacy.example
   i:C = US, O = Let's Encrypt, CN = R3
---
Server certificate
-----BEGIN CERTIFICATE-----
MIIB
-----END CERTIFICATE-----
notBefore=Mar  1 00:00:00 2024 GMT
notAfter=Mar  1 00:00:00 2099 GMT
serial=04A1B2C3
Server public key is 4096 bit
New, TLSv1.2, Cipher is ECDHE-RSA-AES256-GCM-SHA384
SSL-Session:
    Protocol  : TLSv1.2
    Cipher    : ECDHE-RSA-AES256-GCM-SHA384
";

#[test]
fn test_legacy_dialect() {
    let parsed = parse_transcript(LEGACY).unwrap();
    assert_eq!(parsed.subject.as_deref(), Some("CN = legacy.example"));
    assert_eq!(
        parsed.issuer.as_deref(),
        Some("C = US, O = Let's Encrypt, CN = R3")
    );
    assert_eq!(parsed.not_after.as_deref(), Some("Mar  1 00:00:00 2099 GMT"));
    assert_eq!(parsed.protocol.as_deref(), Some("TLSv1.2"));
    assert_eq!(parsed.cipher.as_deref(), Some("ECDHE-RSA-AES256-GCM-SHA384"));
    assert_eq!(parsed.chain_depth, 1);
    assert_eq!(parsed.key_size_bits, Some(4096));
    assert!(!parsed.has_verify_warning);
    assert_eq!(parsed.verify_detail, "Certificate accepted with warnings");

    let verdict = classify(&parsed, Utc::now());
    assert_eq!(verdict.status, HealthStatus::Valid);
}

#[test]
fn test_combined_validity_line_wins() {
    let text = format!(
        "{}\n   v:NotBefore: Jan  1 00:00:00 2024 GMT; NotAfter: Feb  2 00:00:00 2030 GMT\n",
        LEGACY
    );
    let (not_before, not_after) = extract_validity(&text);
    assert_eq!(not_before.as_deref(), Some("Jan  1 00:00:00 2024 GMT"));
    assert_eq!(not_after.as_deref(), Some("Feb  2 00:00:00 2030 GMT"));
}

#[test]
fn test_short_circuit_order() {
    // a refusal marker wins even when a certificate block is present
    let refused = format!("connect: Connection refused\n{}", LEGACY);
    assert_eq!(
        parse_transcript(&refused).unwrap_err(),
        CertificateError::ConnectionFailed
    );

    // no certificate block wins over missing dates
    assert_eq!(
        parse_transcript("CONNECTED(00000003)\nno peer certificate available\n").unwrap_err(),
        CertificateError::NoCertificate
    );

    let undated = "Certificate chain\n 0 s:CN = a.example\n   i:CN = a.example\n";
    assert_eq!(
        parse_transcript(undated).unwrap_err(),
        CertificateError::MissingDates
    );
}

#[test]
fn test_unreachable_network_markers() {
    for marker in ["Network is unreachable", "Name or service not known"] {
        let text = format!("{}\n{}", marker, LEGACY);
        assert_eq!(
            parse_transcript(&text).unwrap_err(),
            CertificateError::ConnectionFailed
        );
    }
}

#[test]
fn test_parse_is_deterministic() {
    assert_eq!(parse_transcript(LEGACY), parse_transcript(LEGACY));
}

#[test]
fn test_depth_and_key_size_defaults() {
    assert_eq!(extract_chain_depth("Certificate chain"), 0);
    assert_eq!(extract_key_size("Certificate chain"), None);
}

#[test]
fn test_expired_certificate() {
    let now = Utc::now();
    let not_after = now - Duration::days(3) - Duration::hours(2);
    let text = format!(
        "Certificate chain\n 0 s:CN = old.example\n   i:CN = old.example\n   v:NotBefore: Jan  1 00:00:00 2020 GMT; NotAfter: {} GMT\nverify error:num=18:self-signed certificate\n",
        not_after.format("%b %e %H:%M:%S %Y")
    );
    let parsed = parse_transcript(&text).unwrap();
    let verdict = classify(&parsed, now);
    assert_eq!(verdict.status, HealthStatus::Expired);
    assert!(verdict.is_expired);
    assert_eq!(verdict.days_until_expiry, Some(-3));
    assert_eq!(verdict.message, "Certificate expired 3 days ago");
}

#[test]
fn test_date_format_round_trip_through_padding() {
    let padded = parse_openssl_date("Aug  2 04:39:31 2025 GMT").unwrap();
    let single = parse_openssl_date("Aug 2 04:39:31 2025 GMT").unwrap();
    assert_eq!(padded, single);
}
