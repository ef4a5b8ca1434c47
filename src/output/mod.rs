//! Output formatting module
//!
//! Provides the output formats:
//! - Rich terminal output with colors and tables
//! - JSON export
//! - Plain text / JSON report files

pub mod json;
pub mod report;
pub mod terminal;

pub use json::{print_json, to_json_string, ResultsEnvelope};
pub use report::{render_text_report, write_report, BatchSummary, ReportFormat};
pub use terminal::{
    print_batch_summary, print_header, print_inspection_detail, print_probe_table,
    print_results_table, result_line, status_label,
};
