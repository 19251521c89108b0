//! # Prime Lookup Endpoints
//!
//! | Endpoint | Response |
//! |----------|----------|
//! | `GET /?compute=N` | Plain-text sentence naming the Nth prime |
//! | `GET /api/nth/{ordinal}` | `{"ordinal": N, "prime": P}` |
//! | `GET /api/table` | Table summary (bound, count, largest, …) |
//!
//! A missing or non-integer ordinal is a client error (400). A well-formed
//! ordinal outside `1..=count` is 404.

use super::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Deserialize)]
pub(super) struct ComputeQuery {
    compute: Option<String>,
}

/// English ordinal suffix: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st, …
pub(super) fn ordinal_suffix(n: i64) -> &'static str {
    let n = n.unsigned_abs();
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

fn plain(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// `GET /?compute=N` — plain-text query interface.
pub(super) async fn handler_compute(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ComputeQuery>,
) -> Response {
    let raw = match params.compute.as_deref() {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            state.prom_metrics.record_lookup("invalid");
            return plain(
                StatusCode::BAD_REQUEST,
                "Please provide the nth value via '?compute=' query parameter.\n".to_string(),
            );
        }
    };

    let ordinal: i64 = match raw.parse() {
        Ok(n) => n,
        Err(_) => {
            state.prom_metrics.record_lookup("invalid");
            return plain(
                StatusCode::BAD_REQUEST,
                format!("Please provide a valid nth value. Invalid input {}\n", raw),
            );
        }
    };

    let table = &state.table;
    match table.nth(ordinal) {
        Some(prime) => {
            debug!(ordinal, prime, "lookup");
            state.prom_metrics.record_lookup("found");
            plain(
                StatusCode::OK,
                format!(
                    "The {}{} Prime number is {}\n",
                    ordinal,
                    ordinal_suffix(ordinal),
                    prime
                ),
            )
        }
        None => {
            debug!(ordinal, count = table.len(), "lookup out of range");
            state.prom_metrics.record_lookup("not_found");
            plain(
                StatusCode::NOT_FOUND,
                format!(
                    "Failed to find the {}{} prime number. There are only {} prime numbers between 0 - {}\n",
                    ordinal,
                    ordinal_suffix(ordinal),
                    table.len(),
                    table.bound()
                ),
            )
        }
    }
}

/// `GET /api/nth/{ordinal}` — JSON lookup.
pub(super) async fn handler_api_nth(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Response {
    let Ok(ordinal) = raw.parse::<i64>() else {
        state.prom_metrics.record_lookup("invalid");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": format!("invalid ordinal: {}", raw)})),
        )
            .into_response();
    };

    match state.table.nth(ordinal) {
        Some(prime) => {
            state.prom_metrics.record_lookup("found");
            Json(serde_json::json!({"ordinal": ordinal, "prime": prime})).into_response()
        }
        None => {
            state.prom_metrics.record_lookup("not_found");
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": format!("ordinal {} out of range", ordinal),
                    "count": state.table.len(),
                    "bound": state.table.bound(),
                })),
            )
                .into_response()
        }
    }
}

/// `GET /api/table` — shape of the precomputed table.
pub(super) async fn handler_api_table(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.table.summary())
}
