//! Request handlers for the API server

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::checks::{detect_version, HandshakeInvoker};
use crate::models::{
    now_timestamp, InspectionTarget, ProbeResult, TargetId, TargetRequest,
    DEFAULT_TLS_PORT, NOT_AVAILABLE,
};
use crate::runner::{inspect_target, run_batch};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub const SERVICE_NAME: &str = "Cert Health Checker API";

/// Body of `POST /api/health-check`
#[derive(Debug, Deserialize)]
pub struct ProbeRequest {
    #[serde(default)]
    pub urls: Vec<TargetRequest>,
}

/// Body of `POST /api/ssl-inspect`: either one `hostname`/`port` pair or a
/// `urls` batch
#[derive(Debug, Deserialize)]
pub struct InspectRequest {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub urls: Vec<TargetRequest>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse<T: Serialize> {
    pub results: Vec<T>,
}

/// Service index
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/health",
            "systemInfo": "GET /api/system-info",
            "healthCheck": "POST /api/health-check",
            "sslInspect": "POST /api/ssl-inspect",
        },
        "timestamp": now_timestamp(),
    }))
}

/// Liveness of the API itself
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": now_timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Host and TLS client information
pub async fn system_info<I: HandshakeInvoker + 'static>(
    State(state): State<Arc<AppState<I>>>,
) -> Json<Value> {
    let openssl = detect_version(&state.openssl_path)
        .await
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Json(json!({
        "openssl": openssl,
        "platform": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "uptime": state.started.elapsed().as_secs_f64(),
        "timestamp": now_timestamp(),
    }))
}

/// HTTP liveness probe over a list of URLs
pub async fn health_check<I: HandshakeInvoker + 'static>(
    State(state): State<Arc<AppState<I>>>,
    Json(request): Json<ProbeRequest>,
) -> Json<ResultsResponse<ProbeResult>> {
    let enabled = request.urls.iter().filter(|u| u.enabled).count();
    info!("Health check: testing {} URLs", enabled);

    let results = state.prober.probe_all(&request.urls).await;
    Json(ResultsResponse { results })
}

/// Certificate inspection of a single host or a batch
pub async fn ssl_inspect<I: HandshakeInvoker + 'static>(
    State(state): State<Arc<AppState<I>>>,
    Json(request): Json<InspectRequest>,
) -> ApiResult<Response> {
    if let Some(hostname) = request.hostname.as_deref().filter(|h| !h.trim().is_empty()) {
        let mut target = InspectionTarget::parse(TargetId::from(1usize), hostname, DEFAULT_TLS_PORT)
            .ok_or_else(|| ApiError::BadRequest(format!("invalid hostname '{}'", hostname)))?;
        if let Some(port) = request.port {
            target.port = port;
        }

        info!("SSL inspect: single request for {}", target.address());
        let result = inspect_target(&state.invoker, &target, &state.options).await;
        return Ok(Json(result).into_response());
    }

    let enabled = request.urls.iter().filter(|u| u.enabled).count();
    info!("SSL inspect: testing {} certificates", enabled);

    let results = run_batch(&state.invoker, &request.urls, &state.options).await;
    Ok(Json(ResultsResponse { results }).into_response())
}
