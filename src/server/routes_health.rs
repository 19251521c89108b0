//! # Health & Observability Endpoints
//!
//! | Endpoint | Purpose | K8s Probe |
//! |----------|---------|-----------|
//! | `GET /health` | Liveness — process is alive | `livenessProbe` |
//! | `GET /readiness` | Readiness — prime table loaded | `readinessProbe` |
//! | `GET /metrics` | Prometheus scraping endpoint | `ServiceMonitor` |
//!
//! The table is built before the listener binds, so readiness only fails if
//! the configured bound produced no primes at all.

use super::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// Liveness probe: returns 200 if the process is running.
pub async fn handler_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Readiness probe: 200 once the table holds at least one prime.
pub async fn handler_readiness(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let primes = state.table.len();
    let status = if primes > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "status": if primes > 0 { "ready" } else { "empty" },
            "primes": primes,
            "started_at": state.started_at.to_rfc3339(),
        })),
    )
}

/// Prometheus metrics endpoint: returns all metrics in text exposition format.
pub async fn handler_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state.prom_metrics.encode();
    (
        StatusCode::OK,
        [(
            "content-type",
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        body,
    )
}
