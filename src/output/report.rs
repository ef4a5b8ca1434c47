//! Plain text and JSON inspection reports

use crate::models::{HealthStatus, InspectionResult};
use crate::utils::ReportError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Counts shown at the top of a report and in the terminal summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub connected: usize,
    pub failed: usize,
    pub valid: usize,
    pub expiring_soon: usize,
    pub expired_or_invalid: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[InspectionResult]) -> Self {
        let count = |pred: &dyn Fn(&InspectionResult) -> bool| results.iter().filter(|r| pred(r)).count();
        Self {
            total: results.len(),
            connected: count(&|r| r.connected),
            failed: count(&|r| !r.connected),
            valid: count(&|r| r.status == HealthStatus::Valid),
            expiring_soon: count(&|r| r.status == HealthStatus::Warning),
            expired_or_invalid: count(&|r| {
                matches!(r.status, HealthStatus::Expired | HealthStatus::Error)
            }),
        }
    }
}

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    /// Pick a format from the file extension, defaulting to text
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ReportFormat::Json,
            _ => ReportFormat::Text,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    generated: String,
    summary: BatchSummary,
    results: &'a [InspectionResult],
}

/// Render the plain text report
pub fn render_text_report(results: &[InspectionResult], generated_at: DateTime<Utc>) -> String {
    let summary = BatchSummary::from_results(results);
    let mut lines = vec![
        "SSL Inspection Report".to_string(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
        "=== SUMMARY ===".to_string(),
        format!("Total Targets Checked: {}", summary.total),
        format!("Successful Connections: {}", summary.connected),
        format!("Failed Connections: {}", summary.failed),
        format!("Valid Certificates: {}", summary.valid),
        format!("Expiring Soon: {}", summary.expiring_soon),
        format!("Expired/Invalid: {}", summary.expired_or_invalid),
        String::new(),
        "=== DETAILED RESULTS ===".to_string(),
    ];

    for (index, result) in results.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {}", index + 1, result.address()));
        lines.push(format!("   Status: {}", result.status.to_string().to_uppercase()));
        lines.push(format!(
            "   Connected: {}",
            if result.connected { "Yes" } else { "No" }
        ));

        match &result.certificate {
            Some(cert) => lines.extend([
                format!("   Protocol: {}", result.protocol.as_deref().unwrap_or_default()),
                format!("   Cipher: {}", result.cipher.as_deref().unwrap_or_default()),
                format!("   Certificate Subject: {}", cert.subject),
                format!("   Issuer: {}", cert.issuer),
                format!("   Valid From: {}", cert.valid_from),
                format!("   Valid To: {}", cert.valid_to),
                format!("   Days Until Expiry: {}", cert.days_until_expiry),
                format!("   Key Size: {}", cert.key_size),
                format!("   Serial Number: {}", cert.serial_number),
                format!("   Verification: {}", cert.verify_result),
                format!("   Response Time: {}ms", result.response_time_ms),
            ]),
            None => lines.push(format!("   Error: {}", result.message)),
        }
    }

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// Write a report for `results` to `path`
pub fn write_report(
    path: &Path,
    results: &[InspectionResult],
    format: ReportFormat,
) -> Result<(), ReportError> {
    let generated_at = Utc::now();
    let content = match format {
        ReportFormat::Text => render_text_report(results, generated_at),
        ReportFormat::Json => serde_json::to_string_pretty(&JsonReport {
            generated: generated_at.to_rfc3339(),
            summary: BatchSummary::from_results(results),
            results,
        })
        .map_err(|e| ReportError::Serialize {
            message: e.to_string(),
        })?,
    };

    std::fs::write(path, content).map_err(|e| ReportError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InspectionTarget, ParsedCertificate, Verdict};
    use chrono::TimeZone;

    fn sample_results() -> Vec<InspectionResult> {
        let ok_target = InspectionTarget::new(1usize, "example.com", 443);
        let parsed = ParsedCertificate {
            subject: Some("CN = example.com".to_string()),
            not_after: Some("Jan  1 00:00:00 2099 GMT".to_string()),
            verify_detail: "Unknown".to_string(),
            ..Default::default()
        };
        let verdict = Verdict {
            status: HealthStatus::Valid,
            message: "Certificate is valid".to_string(),
            days_until_expiry: Some(1000),
            is_expired: false,
            not_before: None,
            not_after: None,
        };
        let ok = InspectionResult::from_verdict(&ok_target, &parsed, verdict, 20);

        let bad_target = InspectionTarget::new(2usize, "down.example", 8443);
        let bad = InspectionResult::failure(&bad_target, "Connection timeout (10s)", 10_000, None);
        vec![ok, bad]
    }

    #[test]
    fn test_summary_counts() {
        let summary = BatchSummary::from_results(&sample_results());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.connected, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.expiring_soon, 0);
        assert_eq!(summary.expired_or_invalid, 1);
    }

    #[test]
    fn test_text_report_sections() {
        let generated = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let report = render_text_report(&sample_results(), generated);
        assert!(report.starts_with("SSL Inspection Report\nGenerated: 2025-06-01 12:00:00 UTC"));
        assert!(report.contains("Total Targets Checked: 2"));
        assert!(report.contains("1. example.com:443\n   Status: VALID"));
        assert!(report.contains("Certificate Subject: CN = example.com"));
        assert!(report.contains("2. down.example:8443"));
        assert!(report.contains("Error: Connection timeout (10s)"));
    }

    #[test]
    fn test_text_report_layout() {
        let generated = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let report = render_text_report(&sample_results(), generated);
        assert!(report.contains("UTC\n\n=== SUMMARY ===\nTotal Targets Checked: 2\n"));
        assert!(report.contains("Expired/Invalid: 1\n\n=== DETAILED RESULTS ===\n\n1. example.com:443\n"));
        assert!(report.contains("Response Time: 20ms\n\n2. down.example:8443\n"));
        assert!(report.ends_with("   Error: Connection timeout (10s)\n"));

        let empty = render_text_report(&[], generated);
        assert!(empty.ends_with("=== DETAILED RESULTS ===\n"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ReportFormat::from_path(Path::new("out.JSON")), ReportFormat::Json);
        assert_eq!(ReportFormat::from_path(Path::new("out.txt")), ReportFormat::Text);
        assert_eq!(ReportFormat::from_path(Path::new("report")), ReportFormat::Text);
    }
}
