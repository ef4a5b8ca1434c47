//! Batch inspection command implementation

use crate::checks::OpensslInvoker;
use crate::cli::{BatchArgs, OutputFormat};
use crate::config::Settings;
use crate::models::TargetRequest;
use crate::output::result_line;
use crate::runner::{dispatchable_targets, run_targets_with_events, BatchOptions};
use crate::utils::progress::BatchProgress;
use crate::utils::ToolkitError;
use std::path::Path;
use std::time::Duration;

/// Read batch targets from a file.
///
/// A file whose content starts with `[` is a JSON array of target requests;
/// anything else is one host specification per line, with blank lines and
/// `#` comments ignored.
pub fn load_targets(path: &Path) -> Result<Vec<TargetRequest>, ToolkitError> {
    let content = std::fs::read_to_string(path)?;

    if content.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(&content)?);
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(TargetRequest::from_spec)
        .collect())
}

/// Run the batch command
pub async fn run_batch_command(
    args: &BatchArgs,
    settings: &Settings,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let requests = load_targets(&args.file)?;
    let targets = dispatchable_targets(&requests);
    if targets.is_empty() {
        return Err(ToolkitError::InvalidTarget(format!(
            "no enabled targets found in {}",
            args.file.display()
        ))
        .into());
    }

    let mut options = BatchOptions::from_settings(&settings.inspection);
    if let Some(parallel) = args.parallel {
        options.parallel = parallel.max(1);
    }
    if let Some(secs) = args.timeout {
        options.handshake_timeout = Duration::from_secs(secs.max(1));
    }
    if let Some(secs) = args.batch_timeout {
        options.batch_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    let invoker = OpensslInvoker::new(&settings.inspection);
    let progress = match format {
        OutputFormat::Table => BatchProgress::new(targets.len() as u64, "Inspecting certificates"),
        OutputFormat::Json => BatchProgress::hidden(),
    };

    let results = run_targets_with_events(&invoker, &targets, &options, &|result| {
        progress.complete_target(&result_line(result));
    })
    .await;
    progress.finish_and_clear();

    super::emit_results(&results, format, output, args.issues_only)
}
