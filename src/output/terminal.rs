//! Rich terminal output formatting

use crate::models::{HealthStatus, InspectionResult, ProbeResult, ProbeStatus};
use crate::output::report::BatchSummary;
use console::style;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style as TabledStyle},
    Table, Tabled,
};

/// Print section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", style(format!("━━━ {} ━━━", title)).cyan().bold());
    println!();
}

/// Icon and label for a certificate status, coloured by severity
pub fn status_label(status: HealthStatus) -> String {
    let label = format!("{} {}", status.icon(), status);
    match status {
        HealthStatus::Valid => style(label).green().to_string(),
        HealthStatus::Warning => style(label).yellow().to_string(),
        HealthStatus::Expired | HealthStatus::Error => style(label).red().to_string(),
    }
}

fn probe_label(status: ProbeStatus) -> String {
    match status {
        ProbeStatus::Healthy => style("✓ Healthy").green().to_string(),
        ProbeStatus::Warning => style("! Warning").yellow().to_string(),
        ProbeStatus::Error => style("✗ Error").red().to_string(),
    }
}

/// One-line summary of a finished inspection, used for progress output
pub fn result_line(result: &InspectionResult) -> String {
    format!(
        "{} {} {} ({}ms)",
        status_label(result.status),
        style(result.address()).bold(),
        result.message,
        result.response_time_ms
    )
}

/// Print a table of inspection results
pub fn print_results_table(results: &[InspectionResult]) {
    #[derive(Tabled)]
    struct ResultRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Target")]
        target: String,
        #[tabled(rename = "Status")]
        status: String,
        #[tabled(rename = "Days Left")]
        days: String,
        #[tabled(rename = "Protocol")]
        protocol: String,
        #[tabled(rename = "Message")]
        message: String,
        #[tabled(rename = "Time")]
        time: String,
    }

    let rows: Vec<ResultRow> = results
        .iter()
        .map(|r| ResultRow {
            id: r.id.to_string(),
            target: r.address(),
            status: status_label(r.status),
            days: r
                .certificate
                .as_ref()
                .map(|c| c.days_until_expiry.to_string())
                .unwrap_or_else(|| "-".to_string()),
            protocol: r.protocol.clone().unwrap_or_else(|| "-".to_string()),
            message: r.message.clone(),
            time: format!("{}ms", r.response_time_ms),
        })
        .collect();

    let table = Table::new(rows)
        .with(TabledStyle::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();
    println!("{}", table);
}

/// Print the full certificate block of one result
pub fn print_inspection_detail(result: &InspectionResult) {
    print_header(&format!("Certificate: {}", result.address()));

    println!("  {:<20} {}", "Status:", status_label(result.status));
    println!("  {:<20} {}", "Message:", result.message);
    println!(
        "  {:<20} {}",
        "Connected:",
        if result.connected { "Yes" } else { "No" }
    );
    println!("  {:<20} {}ms", "Response Time:", result.response_time_ms);

    if let Some(details) = &result.error_details {
        let first_line = details.lines().next().unwrap_or_default();
        println!("  {:<20} {}", "Error:", style(first_line).dim());
    }

    let Some(cert) = &result.certificate else {
        return;
    };

    if let Some(protocol) = &result.protocol {
        println!("  {:<20} {}", "Protocol:", protocol);
    }
    if let Some(cipher) = &result.cipher {
        println!("  {:<20} {}", "Cipher:", cipher);
    }
    println!("  {:<20} {}", "Subject:", cert.subject);
    println!("  {:<20} {}", "Issuer:", cert.issuer);
    println!("  {:<20} {}", "Valid From:", cert.valid_from);
    println!("  {:<20} {}", "Valid To:", cert.valid_to);

    let days = if cert.is_expired {
        style(cert.days_until_expiry.to_string()).red()
    } else if cert.days_until_expiry <= 30 {
        style(cert.days_until_expiry.to_string()).yellow()
    } else {
        style(cert.days_until_expiry.to_string()).green()
    };
    println!("  {:<20} {}", "Days Until Expiry:", days);
    println!("  {:<20} {}", "Verification:", cert.verify_result);
    println!("  {:<20} {}", "Chain Depth:", cert.chain_depth);
    println!("  {:<20} {}", "Serial Number:", cert.serial_number);
    println!("  {:<20} {}", "Key Size:", cert.key_size);
}

/// Print batch summary counts
pub fn print_batch_summary(results: &[InspectionResult]) {
    let summary = BatchSummary::from_results(results);
    print_header("Inspection Summary");

    println!("  Total targets checked: {}", style(summary.total).bold());
    println!("  Connected: {}", style(summary.connected).green());
    println!("  Failed: {}", style(summary.failed).red());
    println!("  Valid: {}", style(summary.valid).green());
    println!("  Expiring soon: {}", style(summary.expiring_soon).yellow());
    println!("  Expired/invalid: {}", style(summary.expired_or_invalid).red());
}

/// Print a table of HTTP probe results
pub fn print_probe_table(results: &[ProbeResult]) {
    #[derive(Tabled)]
    struct ProbeRow {
        #[tabled(rename = "URL")]
        url: String,
        #[tabled(rename = "Status")]
        status: String,
        #[tabled(rename = "Message")]
        message: String,
        #[tabled(rename = "Time")]
        time: String,
    }

    let rows: Vec<ProbeRow> = results
        .iter()
        .map(|r| ProbeRow {
            url: r.url.clone(),
            status: probe_label(r.status),
            message: r.message.clone(),
            time: format!("{}ms", r.response_time),
        })
        .collect();

    let table = Table::new(rows).with(TabledStyle::rounded()).to_string();
    println!("{}", table);

    let healthy = results
        .iter()
        .filter(|r| r.status == ProbeStatus::Healthy)
        .count();
    println!();
    println!("  {}/{} healthy", style(healthy).bold(), results.len());
}
