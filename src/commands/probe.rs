//! HTTP probe command implementation

use crate::checks::HttpProber;
use crate::cli::{OutputFormat, ProbeArgs};
use crate::config::Settings;
use crate::models::TargetRequest;
use crate::output::{print_json, print_probe_table, ResultsEnvelope};
use crate::utils::progress::create_spinner;

/// Run the probe command
pub async fn run_probe(
    args: &ProbeArgs,
    settings: &Settings,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut probe_settings = settings.probe.clone();
    if let Some(secs) = args.timeout {
        probe_settings.timeout_secs = secs.max(1);
    }
    let prober = HttpProber::new(&probe_settings)?;

    let requests: Vec<TargetRequest> = args.urls.iter().map(TargetRequest::from_spec).collect();

    let spinner = match format {
        OutputFormat::Table => Some(create_spinner(&format!(
            "Probing {} URLs...",
            requests.len()
        ))),
        OutputFormat::Json => None,
    };
    let results = prober.probe_all(&requests).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match format {
        OutputFormat::Json => print_json(&ResultsEnvelope { results: &results })?,
        OutputFormat::Table => print_probe_table(&results),
    }
    Ok(())
}
