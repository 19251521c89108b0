//! # Server — HTTP Query Service
//!
//! Runs an Axum HTTP server in front of a prebuilt [`PrimeTable`]. The table is
//! constructed before this module is entered and handed over in an `Arc`, so
//! handlers only ever read it.
//!
//! Request handling is wrapped in the same middleware stack for every route:
//! panic catching, request-id propagation with a tracing span, latency
//! histogram, `TraceLayer`, and a per-request timeout. Shutdown is triggered by
//! SIGINT/SIGTERM and bounded by a grace period.

mod routes_health;
mod routes_prime;

use crate::prom_metrics;
use crate::table::PrimeTable;
use anyhow::Result;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Instrument};

/// Default listen address, matching the port the service has always used.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

/// Runtime knobs for the HTTP layer.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Upper bound on a single request; exceeded requests get 408.
    pub request_timeout: Duration,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout: Duration::from_secs(10),
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

pub struct AppState {
    pub table: Arc<PrimeTable>,
    pub prom_metrics: prom_metrics::Metrics,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(table: Arc<PrimeTable>) -> Arc<Self> {
        let prom_metrics = prom_metrics::Metrics::new();
        prom_metrics.table_primes.set(table.len() as i64);
        prom_metrics
            .table_bound
            .set(i64::try_from(table.bound()).unwrap_or(i64::MAX));
        prom_metrics
            .table_build_seconds
            .set(table.build_duration().as_secs_f64());
        Arc::new(AppState {
            table,
            prom_metrics,
            started_at: Utc::now(),
        })
    }
}

/// Middleware that records HTTP request duration into the Prometheus histogram,
/// generates (or propagates) a request ID for correlation, and wraps the
/// request in a tracing span using `.instrument()` for proper async propagation.
async fn metrics_middleware(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> axum::response::Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = req.method().to_string();
    let raw_path = req.uri().path().to_string();
    let norm_path = normalize_path(&raw_path);
    let start = std::time::Instant::now();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %raw_path,
    );
    let mut response = next.run(req).instrument(span).await;

    let duration = start.elapsed().as_secs_f64();
    state
        .prom_metrics
        .http_request_duration
        .get_or_create(&prom_metrics::HttpLabel {
            method,
            path: norm_path,
        })
        .observe(duration);

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Collapse caller-controlled path segments into placeholders so the latency
/// histogram has a fixed label set.
fn normalize_path(path: &str) -> String {
    match path {
        "/" | "/health" | "/readiness" | "/metrics" | "/api/table" => path.to_string(),
        p if p.starts_with("/api/nth/") => "/api/nth/:ordinal".to_string(),
        _ => "unmatched".to_string(),
    }
}

pub fn build_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/", get(routes_prime::handler_compute))
        .route("/api/nth/{ordinal}", get(routes_prime::handler_api_nth))
        .route("/api/table", get(routes_prime::handler_api_table))
        .route("/health", get(routes_health::handler_health))
        .route("/readiness", get(routes_health::handler_readiness))
        .route("/metrics", get(routes_health::handler_metrics));
    with_middleware(routes, state, request_timeout)
}

/// Apply the shared middleware stack. The timeout sits inside
/// `metrics_middleware` so 408 responses still get a request id and a
/// latency sample.
fn with_middleware(
    routes: Router<Arc<AppState>>,
    state: Arc<AppState>,
    request_timeout: Duration,
) -> Router {
    routes
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.listen` and serve `table` until SIGINT or SIGTERM.
pub async fn run(table: Arc<PrimeTable>, config: &ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.listen).await?;
    info!(addr = %listener.local_addr()?, "server listening");
    serve(listener, AppState::new(table), config, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves, then give
/// in-flight requests `config.shutdown_grace` to finish.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    config: &ServerConfig,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let app = build_router(state, config.request_timeout);
    serve_app(listener, app, config.shutdown_grace, shutdown).await
}

async fn serve_app<F>(listener: TcpListener, app: Router, grace: Duration, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        res = &mut server => {
            // Exited without being asked to: surface the error, if any.
            res??;
            return Ok(());
        }
        _ = shutdown => {}
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(grace, &mut server).await {
        Ok(res) => {
            res??;
            info!("server shut down gracefully");
        }
        Err(_) => {
            // Connection tasks still running die with the runtime when `run` returns.
            warn!(
                grace_secs = grace.as_secs_f64(),
                "shutdown grace period elapsed, dropping in-flight requests"
            );
            server.abort();
        }
    }
    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! { _ = ctrl_c => info!("received SIGINT, shutting down"), _ = sigterm.recv() => info!("received SIGTERM, shutting down") }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                ctrl_c.await.ok();
                info!("received SIGINT, shutting down");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("received SIGINT, shutting down");
    }
}
