//! Certificate health classification
//!
//! Derives a [`Verdict`] from a parsed certificate and the current time.

use crate::models::{HealthStatus, ParsedCertificate, Verdict};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Certificates expiring within this many days are reported as warnings
pub const EXPIRY_WARNING_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parse a timestamp as printed by the OpenSSL client, e.g.
/// `Aug 18 08:39:58 2025 GMT` or the space-padded `Aug  2 04:39:31 2025 GMT`.
pub fn parse_openssl_date(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_zone = normalized
        .strip_suffix(" GMT")
        .or_else(|| normalized.strip_suffix(" UTC"))
        .unwrap_or(&normalized);

    if let Ok(naive) = NaiveDateTime::parse_from_str(without_zone, "%b %d %H:%M:%S %Y") {
        return Some(naive.and_utc());
    }

    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole days until `not_after`, rounding any partial day up
pub fn days_until(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (not_after - now).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Classify with the standard 30 day warning window
pub fn classify(parsed: &ParsedCertificate, now: DateTime<Utc>) -> Verdict {
    classify_with_threshold(parsed, now, EXPIRY_WARNING_DAYS)
}

/// Classify a parsed certificate.
///
/// Expiry dominates: an expired certificate is `Expired` even when it also
/// carries a verification warning, and an imminent expiry is reported in
/// preference to a self-signed chain.
pub fn classify_with_threshold(
    parsed: &ParsedCertificate,
    now: DateTime<Utc>,
    warning_days: i64,
) -> Verdict {
    let Some(not_after) = parsed.not_after.as_deref().and_then(parse_openssl_date) else {
        return Verdict::error("Could not parse certificate dates");
    };
    let not_before = parsed.not_before.as_deref().and_then(parse_openssl_date);

    let days = days_until(not_after, now);
    let is_expired = not_after < now;

    let (status, message) = if is_expired {
        (
            HealthStatus::Expired,
            format!("Certificate expired {} days ago", days.abs()),
        )
    } else if days <= warning_days {
        (
            HealthStatus::Warning,
            format!("Certificate expires in {} days", days),
        )
    } else if parsed.has_verify_warning {
        (
            HealthStatus::Warning,
            "Certificate has verification warnings (self-signed chain)".to_string(),
        )
    } else {
        (HealthStatus::Valid, "Certificate is valid".to_string())
    };

    Verdict {
        status,
        message,
        days_until_expiry: Some(days),
        is_expired,
        not_before,
        not_after: Some(not_after),
    }
}
