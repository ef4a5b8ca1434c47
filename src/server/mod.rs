//! HTTP API server
//!
//! Exposes the liveness prober and the certificate pipeline over JSON.

pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiResult};

use crate::checks::{detect_version, HandshakeInvoker, HttpProber, OpensslInvoker};
use crate::config::{ServerSettings, Settings};
use crate::runner::BatchOptions;
use crate::utils::ServerError;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state handed to every handler
pub struct AppState<I> {
    pub invoker: I,
    pub options: BatchOptions,
    pub prober: HttpProber,
    /// Binary queried by `/api/system-info`
    pub openssl_path: String,
    pub started: Instant,
}

impl<I: HandshakeInvoker> AppState<I> {
    pub fn new(invoker: I, options: BatchOptions, prober: HttpProber, openssl_path: String) -> Self {
        Self {
            invoker,
            options,
            prober,
            openssl_path,
            started: Instant::now(),
        }
    }
}

/// Build the API router
pub fn build_router<I: HandshakeInvoker + 'static>(
    state: AppState<I>,
    server: &ServerSettings,
) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route("/api/system-info", get(handlers::system_info::<I>))
        .route("/api/health-check", post(handlers::health_check::<I>))
        .route("/api/ssl-inspect", post(handlers::ssl_inspect::<I>))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// CORS policy from the configured exact origins and HTTPS host suffixes
pub fn cors_layer(server: &ServerSettings) -> CorsLayer {
    let origins = server.allowed_origins.clone();
    let suffixes = server.allowed_origin_suffixes.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request| {
                origin
                    .to_str()
                    .map(|o| origin_allowed(o, &origins, &suffixes))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

/// Whether a browser origin may call the API
pub fn origin_allowed(origin: &str, exact: &[String], suffixes: &[String]) -> bool {
    if exact.iter().any(|o| o == origin) {
        return true;
    }
    let Some(host) = origin.strip_prefix("https://") else {
        return false;
    };
    suffixes
        .iter()
        .any(|suffix| host.len() > suffix.len() && host.ends_with(suffix.as_str()))
}

/// Run the API server until interrupted
pub async fn serve(settings: &Settings, bind: Option<&str>) -> Result<(), ServerError> {
    let invoker = OpensslInvoker::new(&settings.inspection);
    match detect_version(&settings.inspection.openssl_path).await {
        Some(version) => info!("OpenSSL available: {}", version),
        None => warn!(
            "OpenSSL not found at '{}'; certificate inspection will fail",
            settings.inspection.openssl_path
        ),
    }
    if invoker.wrapper_available().await == Some(false) {
        warn!(
            "Timeout wrapper '{}' cannot be launched; certificate inspection will fail",
            settings.inspection.timeout_program
        );
    }

    let prober = HttpProber::new(&settings.probe).map_err(|e| ServerError::Serve {
        message: e.to_string(),
    })?;
    let state = AppState::new(
        invoker,
        BatchOptions::from_settings(&settings.inspection),
        prober,
        settings.inspection.openssl_path.clone(),
    );
    let app = build_router(state, &settings.server);

    let addr = bind.unwrap_or(settings.server.bind.as_str());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve {
            message: e.to_string(),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeSettings;
    use crate::models::{FailureKind, RawHandshakeResult};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    struct RefusingInvoker;

    impl HandshakeInvoker for RefusingInvoker {
        async fn invoke(&self, _hostname: &str, _port: u16, _timeout: Duration) -> RawHandshakeResult {
            RawHandshakeResult::failed(
                FailureKind::ConnectionFailed,
                "connect: Connection refused".to_string(),
                2,
                "client exited with status 1",
            )
        }
    }

    fn app() -> Router {
        let state = AppState::new(
            RefusingInvoker,
            BatchOptions::default(),
            HttpProber::new(&ProbeSettings::default()).unwrap(),
            "/nonexistent/openssl".to_string(),
        );
        build_router(state, &ServerSettings::default())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_origin_rules() {
        let settings = ServerSettings::default();
        let allowed = |o: &str| {
            origin_allowed(o, &settings.allowed_origins, &settings.allowed_origin_suffixes)
        };
        assert!(allowed("http://localhost:5173"));
        assert!(allowed("https://fuzzy-space-1234.app.github.dev"));
        assert!(!allowed("http://fuzzy-space-1234.app.github.dev"));
        assert!(!allowed("https://.app.github.dev"));
        assert!(!allowed("https://evil.example"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_system_info_without_openssl() {
        let response = app()
            .oneshot(Request::get("/api/system-info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["openssl"], "Not available");
        assert_eq!(json["platform"], std::env::consts::OS);
    }

    #[tokio::test]
    async fn test_single_inspection_returns_bare_result() {
        let response = app()
            .oneshot(post_json(
                "/api/ssl-inspect",
                r#"{"hostname": "example.com", "port": 8443}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["hostname"], "example.com");
        assert_eq!(json["port"], 8443);
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Connection failed");
        assert_eq!(json["connected"], false);
    }

    #[tokio::test]
    async fn test_batch_inspection_skips_disabled() {
        let body = r#"{"urls": [
            {"id": 1, "url": "https://a.example/path", "enabled": true},
            {"id": 2, "url": "https://b.example", "enabled": false},
            {"id": "c", "url": "c.example:8443"}
        ]}"#;
        let response = app()
            .oneshot(post_json("/api/ssl-inspect", body))
            .await
            .unwrap();
        let json = body_json(response).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["id"], 1);
        assert_eq!(results[0]["hostname"], "a.example");
        assert_eq!(results[1]["id"], "c");
        assert_eq!(results[1]["port"], 8443);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let response = app()
            .oneshot(post_json("/api/ssl-inspect", r#"{"urls": []}"#))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["results"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_single_hostname_is_bad_request() {
        let response = app()
            .oneshot(post_json("/api/ssl-inspect", r#"{"hostname": "https:///"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/ssl-inspect")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
    }
}
