//! API integration tests for the nthprime Axum endpoints.
//!
//! These tests exercise every public HTTP route using `tower::ServiceExt::oneshot`
//! to send synthetic requests directly to the Axum router without starting a
//! TCP listener. The last group binds a real listener on an ephemeral port to
//! check the serve/shutdown path.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test api_integration
//! ```

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use nthprime::server::{self, AppState, ServerConfig};
use nthprime::PrimeTable;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    common::build_test_app()
}

/// Sends a GET request and returns the status code, raw body text, and the
/// response headers.
async fn get_text(app: Router, uri: &str) -> (StatusCode, String, axum::http::HeaderMap) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned(), headers)
}

/// Sends a GET request and returns the status code and parsed JSON body.
///
/// If the response body is not valid JSON, returns `serde_json::json!(null)`.
async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body, _) = get_text(app, uri).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or(serde_json::json!(null));
    (status, json)
}

// == Plain-text query interface ================================================

#[tokio::test]
async fn compute_first_prime() {
    let (status, body, headers) = get_text(app(), "/?compute=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "The 1st Prime number is 2\n");
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn compute_known_ordinals() {
    let (_, body, _) = get_text(app(), "/?compute=100").await;
    assert_eq!(body, "The 100th Prime number is 541\n");
    let (_, body, _) = get_text(app(), "/?compute=1000").await;
    assert_eq!(body, "The 1000th Prime number is 7919\n");
    let (_, body, _) = get_text(app(), "/?compute=22").await;
    assert_eq!(body, "The 22nd Prime number is 79\n");
}

#[tokio::test]
async fn compute_last_ordinal_is_largest_prime() {
    let (status, body, _) = get_text(app(), "/?compute=3512").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "The 3512th Prime number is 32749\n");
}

#[tokio::test]
async fn compute_missing_param_is_bad_request() {
    let (status, body, _) = get_text(app(), "/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("?compute="));

    let (status, _, _) = get_text(app(), "/?compute=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn compute_non_integer_is_bad_request() {
    for bad in ["abc", "1.5", "12x", "99999999999999999999"] {
        let (status, body, _) = get_text(app(), &format!("/?compute={}", bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "input {}", bad);
        assert!(body.contains(&format!("Invalid input {}", bad)));
    }
}

#[tokio::test]
async fn compute_zero_and_negative_not_found() {
    for ordinal in ["0", "-5"] {
        let (status, body, _) = get_text(app(), &format!("/?compute={}", ordinal)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "ordinal {}", ordinal);
        assert!(body.contains("There are only 3512 prime numbers between 0 - 32767"));
    }
}

#[tokio::test]
async fn compute_past_end_not_found() {
    let (status, body, _) = get_text(app(), "/?compute=3513").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.starts_with("Failed to find the 3513th prime number."));
}

// == JSON API ==================================================================

#[tokio::test]
async fn api_nth_returns_json() {
    let (status, json) = get(app(), "/api/nth/10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ordinal"], 10);
    assert_eq!(json["prime"], 29);
}

#[tokio::test]
async fn api_nth_out_of_range() {
    let (status, json) = get(app(), "/api/nth/0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["count"], 3512);
    assert_eq!(json["bound"], 32767);

    let (status, _) = get(app(), "/api/nth/100000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_nth_malformed_is_bad_request() {
    let (status, json) = get(app(), "/api/nth/seven").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("seven"));
}

#[tokio::test]
async fn api_table_summary() {
    let (status, json) = get(app(), "/api/table").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["bound"], 32767);
    assert_eq!(json["count"], 3512);
    assert_eq!(json["largest"], 32749);
    assert_eq!(json["segment_size"], 181);
}

#[tokio::test]
async fn small_bound_table_is_served() {
    let app = common::build_test_app_with(Arc::new(PrimeTable::build(30)));
    let (_, json) = get(app.clone(), "/api/table").await;
    assert_eq!(json["count"], 10);
    let (status, _) = get(app, "/api/nth/11").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Health and observability ==================================================

#[tokio::test]
async fn health_returns_ok() {
    let (status, body, _) = get_text(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn readiness_reports_table() {
    let (status, json) = get(app(), "/readiness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ready");
    assert_eq!(json["primes"], 3512);
    assert!(json["started_at"].is_string());
}

#[tokio::test]
async fn readiness_unavailable_for_empty_table() {
    let app = common::build_test_app_with(Arc::new(PrimeTable::build(1)));
    let (status, json) = get(app, "/readiness").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["primes"], 0);
}

#[tokio::test]
async fn metrics_counts_lookups() {
    let app = app();
    let _ = get_text(app.clone(), "/?compute=5").await;
    let _ = get_text(app.clone(), "/?compute=0").await;
    let _ = get_text(app.clone(), "/?compute=x").await;
    let (status, body, _) = get_text(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("nthprime_table_primes 3512"));
    assert!(body.contains("nthprime_lookups_total{outcome=\"found\"} 1"));
    assert!(body.contains("nthprime_lookups_total{outcome=\"not_found\"} 1"));
    assert!(body.contains("nthprime_lookups_total{outcome=\"invalid\"} 1"));
    assert!(body.contains("nthprime_http_request_duration_seconds"));
}

// == Middleware ================================================================

#[tokio::test]
async fn request_id_generated_when_absent() {
    let (_, _, headers) = get_text(app(), "/health").await;
    let id = headers["x-request-id"].to_str().unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn request_id_propagated() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, _, _) = get_text(app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Serve and shutdown ========================================================

#[tokio::test]
async fn serve_answers_then_stops_on_shutdown() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ServerConfig {
        listen: addr,
        request_timeout: Duration::from_secs(5),
        shutdown_grace: Duration::from_secs(2),
    };
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let state = AppState::new(common::default_table());
    let handle = tokio::spawn(async move {
        server::serve(listener, state, &config, async move {
            let _ = stop_rx.await;
        })
        .await
    });

    let body = reqwest::get(format!("http://{}/?compute=3", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "The 3rd Prime number is 5\n");

    stop_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop within the grace period")
        .unwrap();
    assert!(result.is_ok());
}
