//! System information command implementation

use crate::checks::{detect_version, OpensslInvoker};
use crate::cli::OutputFormat;
use crate::config::Settings;
use crate::models::{now_timestamp, NOT_AVAILABLE};
use crate::output::{print_header, print_json};
use crate::utils::progress::{print_fail, print_info, print_pass};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub version: String,
    pub openssl: String,
    /// `None` when the client runs without a timeout wrapper
    pub timeout_wrapper: Option<bool>,
    pub platform: String,
    pub arch: String,
    pub timestamp: String,
}

/// Gather version and platform details
pub async fn collect_system_info(settings: &Settings) -> SystemInfo {
    let openssl = detect_version(&settings.inspection.openssl_path)
        .await
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let timeout_wrapper = OpensslInvoker::new(&settings.inspection)
        .wrapper_available()
        .await;

    SystemInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        openssl,
        timeout_wrapper,
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        timestamp: now_timestamp(),
    }
}

/// Run the system-info command
pub async fn run_system_info(settings: &Settings, format: OutputFormat) -> anyhow::Result<()> {
    let info = collect_system_info(settings).await;

    match format {
        OutputFormat::Json => print_json(&info)?,
        OutputFormat::Table => {
            print_header("System Information");
            print_info(&format!("cert-health {}", info.version));
            print_info(&format!("Platform: {} ({})", info.platform, info.arch));
            if info.openssl == NOT_AVAILABLE {
                print_fail(&format!(
                    "OpenSSL not found at '{}'",
                    settings.inspection.openssl_path
                ));
            } else {
                print_pass(&info.openssl);
            }
            match info.timeout_wrapper {
                Some(true) => print_pass(&format!(
                    "Timeout wrapper: {}",
                    settings.inspection.timeout_program
                )),
                Some(false) => print_fail(&format!(
                    "Timeout wrapper '{}' cannot be launched",
                    settings.inspection.timeout_program
                )),
                None => print_info("Timeout wrapper: disabled"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_timeout_program_is_reported() {
        let mut settings = Settings::default();
        settings.inspection.openssl_path = "/nonexistent/openssl-binary".to_string();
        settings.inspection.timeout_program = "/nonexistent/timeout-wrapper".to_string();

        let info = collect_system_info(&settings).await;
        assert_eq!(info.openssl, NOT_AVAILABLE);
        assert_eq!(info.timeout_wrapper, Some(false));
    }

    #[tokio::test]
    async fn test_unwrapped_client_skips_wrapper_check() {
        let mut settings = Settings::default();
        settings.inspection.timeout_program = "/nonexistent/timeout-wrapper".to_string();
        settings.inspection.wrapper_timeout_secs = 0;

        let info = collect_system_info(&settings).await;
        assert_eq!(info.timeout_wrapper, None);
    }
}
