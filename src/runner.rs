//! Inspection orchestration engine
//!
//! Drives the handshake, parse and classify stages for each target and fans
//! batches out with a bounded, order-preserving worker pool. Every stage
//! failure is folded into an error result; nothing escapes this module.

use crate::checks::{classify_with_threshold, parse_transcript, HandshakeInvoker};
use crate::config::InspectionSettings;
use crate::models::{
    FailureKind, InspectionResult, InspectionTarget, RawHandshakeResult, TargetRequest,
};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Knobs for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Outer process-kill timeout for each handshake
    pub handshake_timeout: Duration,
    /// Maximum number of handshakes in flight
    pub parallel: usize,
    /// Overall deadline for the batch, if any
    pub batch_timeout: Option<Duration>,
    pub expiry_warning_days: i64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from_settings(&InspectionSettings::default())
    }
}

impl BatchOptions {
    pub fn from_settings(settings: &InspectionSettings) -> Self {
        Self {
            handshake_timeout: settings.handshake_timeout(),
            parallel: settings.parallel,
            batch_timeout: settings.batch_timeout(),
            expiry_warning_days: settings.expiry_warning_days,
        }
    }
}

/// Enabled requests with a usable hostname, in input order
pub fn dispatchable_targets(requests: &[TargetRequest]) -> Vec<InspectionTarget> {
    requests
        .iter()
        .enumerate()
        .filter_map(|(index, request)| request.to_target(index + 1))
        .collect()
}

/// Inspect a single target
pub async fn inspect_target<I: HandshakeInvoker>(
    invoker: &I,
    target: &InspectionTarget,
    options: &BatchOptions,
) -> InspectionResult {
    let raw = invoker
        .invoke(&target.hostname, target.port, options.handshake_timeout)
        .await;
    let result = assemble(target, raw, options.expiry_warning_days, Utc::now());

    if result.connected {
        info!(
            "{}: {} ({}ms)",
            target.address(),
            result.status,
            result.response_time_ms
        );
    } else {
        warn!(
            "{}: {} ({}ms)",
            target.address(),
            result.message,
            result.response_time_ms
        );
    }
    result
}

/// Turn a handshake transcript into the final result for `target`
pub fn assemble(
    target: &InspectionTarget,
    raw: RawHandshakeResult,
    warning_days: i64,
    now: DateTime<Utc>,
) -> InspectionResult {
    let elapsed = raw.elapsed_ms;

    match raw.failure_kind {
        FailureKind::Timeout => {
            let secs = raw.timeout_secs.unwrap_or_default();
            InspectionResult::failure(
                target,
                format!("Connection timeout ({}s)", secs),
                elapsed,
                raw.detail,
            )
        }
        FailureKind::ConnectionFailed | FailureKind::Other => {
            let transcript = raw.text.trim();
            let details = if transcript.is_empty() {
                raw.detail
            } else {
                Some(transcript.to_string())
            };
            InspectionResult::failure(target, "Connection failed", elapsed, details)
        }
        FailureKind::None => match parse_transcript(&raw.text) {
            Ok(parsed) => {
                let verdict = classify_with_threshold(&parsed, now, warning_days);
                InspectionResult::from_verdict(target, &parsed, verdict, elapsed)
            }
            Err(e) => InspectionResult::failure(target, e.to_string(), elapsed, None),
        },
    }
}

/// Inspect already-resolved targets, returning one result per target in order
pub async fn run_targets<I: HandshakeInvoker>(
    invoker: &I,
    targets: &[InspectionTarget],
    options: &BatchOptions,
) -> Vec<InspectionResult> {
    run_targets_with_events(invoker, targets, options, &|_| {}).await
}

/// Like [`run_targets`], reporting each result as soon as it completes
pub async fn run_targets_with_events<I: HandshakeInvoker>(
    invoker: &I,
    targets: &[InspectionTarget],
    options: &BatchOptions,
    on_result: &(dyn Fn(&InspectionResult) + Sync),
) -> Vec<InspectionResult> {
    let start = Instant::now();
    let deadline = options.batch_timeout.map(|budget| (start + budget, budget));
    let parallel = options.parallel.max(1);

    let inspections: Vec<_> = targets
        .iter()
        .map(|target| async move {
            let result = match deadline {
                Some((deadline, budget)) => {
                    inspect_before(invoker, target, options, deadline, budget).await
                }
                None => inspect_target(invoker, target, options).await,
            };
            on_result(&result);
            result
        })
        .collect();

    let results: Vec<InspectionResult> = stream::iter(inspections)
        .buffered(parallel)
        .collect()
        .await;

    let connected = results.iter().filter(|r| r.connected).count();
    info!(
        "Inspected {} targets ({} connected) in {}ms",
        results.len(),
        connected,
        start.elapsed().as_millis()
    );
    results
}

/// Inspect every dispatchable request of a batch
pub async fn run_batch<I: HandshakeInvoker>(
    invoker: &I,
    requests: &[TargetRequest],
    options: &BatchOptions,
) -> Vec<InspectionResult> {
    let targets = dispatchable_targets(requests);
    run_targets(invoker, &targets, options).await
}

/// Like [`run_batch`], reporting each result as soon as it completes
pub async fn run_batch_with_events<I: HandshakeInvoker>(
    invoker: &I,
    requests: &[TargetRequest],
    options: &BatchOptions,
    on_result: &(dyn Fn(&InspectionResult) + Sync),
) -> Vec<InspectionResult> {
    let targets = dispatchable_targets(requests);
    run_targets_with_events(invoker, &targets, options, on_result).await
}

/// Run one target under the batch deadline. Targets reached after the
/// deadline are never dispatched; in-flight ones are dropped, which kills
/// their client process.
async fn inspect_before<I: HandshakeInvoker>(
    invoker: &I,
    target: &InspectionTarget,
    options: &BatchOptions,
    deadline: Instant,
    budget: Duration,
) -> InspectionResult {
    let started = Instant::now();
    if started >= deadline {
        return batch_timeout_result(target, budget, 0);
    }

    match tokio::time::timeout_at(deadline, inspect_target(invoker, target, options)).await {
        Ok(result) => result,
        Err(_) => {
            let elapsed = started.elapsed().as_millis() as u64;
            warn!("{}: batch deadline reached", target.address());
            batch_timeout_result(target, budget, elapsed)
        }
    }
}

fn batch_timeout_result(
    target: &InspectionTarget,
    budget: Duration,
    elapsed_ms: u64,
) -> InspectionResult {
    InspectionResult::failure(
        target,
        format!("Batch timeout ({}s)", (budget.as_millis() as u64).div_ceil(1000)),
        elapsed_ms,
        None,
    )
}
