//! HTTP liveness prober
//!
//! Issues a plain GET against each URL and reports whether it answered.

use crate::config::ProbeSettings;
use crate::models::{now_timestamp, ProbeHeaders, ProbeResult, ProbeStatus, TargetId, TargetRequest};
use crate::utils::ProbeError;
use reqwest::header::{HeaderMap, HeaderName, CACHE_CONTROL, CONTENT_TYPE, SERVER};
use std::error::Error as StdError;
use std::io;
use std::time::Instant;
use tracing::{info, warn};

/// HTTP liveness prober
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Create a prober with the configured timeout and user agent
    pub fn new(settings: &ProbeSettings) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| ProbeError::ClientBuild {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Probe one URL. Any HTTP response counts as a connection; only
    /// transport errors produce an `error` result without a status code.
    pub async fn probe(&self, id: TargetId, url: &str) -> ProbeResult {
        let request_url = normalize_url(url);
        let start = Instant::now();

        match self.client.get(&request_url).send().await {
            Ok(response) => {
                let response_time = start.elapsed().as_millis() as u64;
                let code = response.status();
                let status = ProbeStatus::from_status_code(code.as_u16());
                let message = format!(
                    "HTTP {} - {}",
                    code.as_u16(),
                    code.canonical_reason().unwrap_or("")
                )
                .trim_end_matches([' ', '-'])
                .to_string();

                info!("{}: {} ({}ms)", url, status, response_time);

                ProbeResult {
                    id,
                    url: url.to_string(),
                    status,
                    response_time,
                    status_code: Some(code.as_u16()),
                    message,
                    timestamp: now_timestamp(),
                    headers: Some(select_headers(response.headers())),
                    error_code: None,
                }
            }
            Err(e) => {
                let response_time = start.elapsed().as_millis() as u64;
                let (message, error_code) = describe_error(&e);
                warn!("{}: {}", url, e);

                ProbeResult {
                    id,
                    url: url.to_string(),
                    status: ProbeStatus::Error,
                    response_time,
                    status_code: None,
                    message,
                    timestamp: now_timestamp(),
                    headers: None,
                    error_code: Some(error_code.to_string()),
                }
            }
        }
    }

    /// Probe every enabled request in order, one at a time
    pub async fn probe_all(&self, requests: &[TargetRequest]) -> Vec<ProbeResult> {
        let mut results = Vec::new();
        for (index, request) in requests.iter().enumerate() {
            if !request.enabled {
                continue;
            }
            let Some(url) = request
                .url
                .as_deref()
                .or(request.hostname.as_deref())
                .filter(|u| !u.trim().is_empty())
            else {
                continue;
            };
            let id = request.id.clone().unwrap_or(TargetId::from(index + 1));
            results.push(self.probe(id, url.trim()).await);
        }

        let healthy = results
            .iter()
            .filter(|r| r.status == ProbeStatus::Healthy)
            .count();
        info!("Probe completed: {}/{} healthy", healthy, results.len());
        results
    }
}

fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

fn select_headers(headers: &HeaderMap) -> ProbeHeaders {
    let get = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    ProbeHeaders {
        content_type: get(CONTENT_TYPE),
        server: get(SERVER),
        cache_control: get(CACHE_CONTROL),
    }
}

/// Map a transport error to a user-facing message and a short error code
fn describe_error(e: &reqwest::Error) -> (String, &'static str) {
    if e.is_timeout() {
        return ("Connection timeout".to_string(), "ETIMEDOUT");
    }

    let mut source = e.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return ("Connection refused".to_string(), "ECONNREFUSED");
            }
            if io_err.kind() == io::ErrorKind::TimedOut {
                return ("Connection timeout".to_string(), "ETIMEDOUT");
            }
        }
        let text = err.to_string().to_lowercase();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return ("Domain not found".to_string(), "ENOTFOUND");
        }
        if text.contains("connection refused") {
            return ("Connection refused".to_string(), "ECONNREFUSED");
        }
        source = err.source();
    }

    if e.is_connect() {
        (e.to_string(), "ECONNECT")
    } else {
        (e.to_string(), "EREQUEST")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/ok", get(|| async { ([(SERVER, "test-server")], "ok") }))
            .route(
                "/missing",
                get(|| async { StatusCode::NOT_FOUND.into_response() }),
            )
            .route(
                "/broken",
                get(|| async { StatusCode::SERVICE_UNAVAILABLE.into_response() }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn prober() -> HttpProber {
        HttpProber::new(&ProbeSettings::default()).unwrap()
    }

    #[test]
    fn test_scheme_is_added() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com/a"), "http://example.com/a");
        assert_eq!(normalize_url(" HTTPS://Example.com "), "HTTPS://Example.com");
    }

    #[tokio::test]
    async fn test_status_bands_and_headers() {
        let base = spawn_server().await;
        let prober = prober();

        let ok = prober.probe(TargetId::from(1usize), &format!("{}/ok", base)).await;
        assert_eq!(ok.status, ProbeStatus::Healthy);
        assert_eq!(ok.status_code, Some(200));
        assert_eq!(ok.message, "HTTP 200 - OK");
        assert_eq!(
            ok.headers.unwrap().server.as_deref(),
            Some("test-server")
        );

        let missing = prober
            .probe(TargetId::from(2usize), &format!("{}/missing", base))
            .await;
        assert_eq!(missing.status, ProbeStatus::Warning);
        assert_eq!(missing.message, "HTTP 404 - Not Found");

        let broken = prober
            .probe(TargetId::from(3usize), &format!("{}/broken", base))
            .await;
        assert_eq!(broken.status, ProbeStatus::Error);
        assert_eq!(broken.status_code, Some(503));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = prober()
            .probe(TargetId::from("down"), &format!("http://{}", addr))
            .await;
        assert_eq!(result.status, ProbeStatus::Error);
        assert_eq!(result.status_code, None);
        assert_eq!(result.message, "Connection refused");
        assert_eq!(result.error_code.as_deref(), Some("ECONNREFUSED"));
    }

    #[tokio::test]
    async fn test_probe_all_skips_disabled() {
        let base = spawn_server().await;
        let mut disabled = TargetRequest::from_spec(format!("{}/ok", base));
        disabled.enabled = false;
        let requests = vec![
            TargetRequest::from_spec(format!("{}/ok", base)),
            disabled,
            TargetRequest::from_spec(format!("{}/missing", base)),
        ];

        let results = prober().probe_all(&requests).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, TargetId::Number(1));
        assert_eq!(results[1].id, TargetId::Number(3));
    }
}
