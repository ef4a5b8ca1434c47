//! Inspect command implementation

use crate::checks::OpensslInvoker;
use crate::cli::{InspectArgs, OutputFormat};
use crate::config::Settings;
use crate::models::{InspectionTarget, TargetId};
use crate::output::{print_inspection_detail, print_json, result_line};
use crate::runner::{inspect_target, run_targets_with_events, BatchOptions};
use crate::utils::progress::{create_spinner, BatchProgress};
use crate::utils::ToolkitError;
use std::path::Path;
use std::time::Duration;

/// Run the inspect command
pub async fn run_inspect(
    args: &InspectArgs,
    settings: &Settings,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let targets = args
        .targets
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            InspectionTarget::parse(TargetId::from(index + 1), spec, args.port)
                .ok_or_else(|| ToolkitError::InvalidTarget(spec.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut options = BatchOptions::from_settings(&settings.inspection);
    if let Some(secs) = args.timeout {
        options.handshake_timeout = Duration::from_secs(secs.max(1));
    }
    let invoker = OpensslInvoker::new(&settings.inspection);

    if let [target] = targets.as_slice() {
        let spinner = match format {
            OutputFormat::Table => Some(create_spinner(&format!(
                "Inspecting {}...",
                target.address()
            ))),
            OutputFormat::Json => None,
        };
        let result = inspect_target(&invoker, target, &options).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        if output.is_some() {
            return super::emit_results(std::slice::from_ref(&result), format, output, false);
        }
        match format {
            OutputFormat::Json => print_json(&result)?,
            OutputFormat::Table => print_inspection_detail(&result),
        }
        return Ok(());
    }

    let progress = match format {
        OutputFormat::Table => BatchProgress::new(targets.len() as u64, "Inspecting certificates"),
        OutputFormat::Json => BatchProgress::hidden(),
    };
    let results = run_targets_with_events(&invoker, &targets, &options, &|result| {
        progress.complete_target(&result_line(result));
    })
    .await;
    progress.finish_and_clear();

    super::emit_results(&results, format, output, false)
}
