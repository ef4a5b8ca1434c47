//! Command implementations for cert-health

pub mod batch;
pub mod inspect;
pub mod probe;
pub mod serve;
pub mod system_info;

pub use batch::{load_targets, run_batch_command};
pub use inspect::run_inspect;
pub use probe::run_probe;
pub use serve::run_serve;
pub use system_info::run_system_info;

use crate::cli::OutputFormat;
use crate::models::InspectionResult;
use crate::output::{
    print_batch_summary, print_json, print_results_table, write_report, ReportFormat,
    ResultsEnvelope,
};
use crate::utils::progress::print_info;
use std::path::Path;

/// Print inspection results in the requested format and write the optional report
pub(crate) fn emit_results(
    results: &[InspectionResult],
    format: OutputFormat,
    output: Option<&Path>,
    issues_only: bool,
) -> anyhow::Result<()> {
    let shown: Vec<InspectionResult> = if issues_only {
        results
            .iter()
            .filter(|r| r.status.is_issue())
            .cloned()
            .collect()
    } else {
        results.to_vec()
    };

    match format {
        OutputFormat::Json => print_json(&ResultsEnvelope { results: &shown })?,
        OutputFormat::Table => {
            println!();
            if shown.is_empty() {
                print_info("No issues found");
            } else {
                print_results_table(&shown);
            }
            print_batch_summary(results);
        }
    }

    if let Some(path) = output {
        write_report(path, results, ReportFormat::from_path(path))?;
        if format == OutputFormat::Table {
            print_info(&format!("Report written to {}", path.display()));
        }
    }

    Ok(())
}
