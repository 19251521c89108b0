//! # Prometheus Metrics — Exposition for Container Orchestration
//!
//! Exposes nthprime operational metrics in the Prometheus text exposition format.
//!
//! ## Metrics Exposed
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `nthprime_http_request_duration_seconds` | Histogram | `method`, `path` | Request latency |
//! | `nthprime_lookups_total` | Counter | `outcome` | Ordinal lookups by result |
//! | `nthprime_table_primes` | Gauge | — | Primes in the table |
//! | `nthprime_table_bound` | Gauge | — | Upper bound of the table |
//! | `nthprime_table_build_seconds` | Gauge | — | Time spent sieving at startup |
//!
//! The table gauges are set once at startup; the `/metrics` endpoint renders
//! the current registry state on each scrape.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;
use std::sync::atomic::AtomicU64;

/// Label set for HTTP request latency.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct HttpLabel {
    pub method: String,
    pub path: String,
}

/// Label set for lookup outcomes: `found`, `not_found`, or `invalid`.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct OutcomeLabel {
    pub outcome: String,
}

impl OutcomeLabel {
    pub fn new(outcome: &str) -> Self {
        Self {
            outcome: outcome.to_string(),
        }
    }
}

fn request_duration_histogram() -> Histogram {
    // 0.1ms .. ~0.4s
    Histogram::new(exponential_buckets(0.0001, 2.0, 12))
}

/// Thread-safe metrics registry for the nthprime server.
pub struct Metrics {
    pub registry: Registry,
    pub http_request_duration: Family<HttpLabel, Histogram, fn() -> Histogram>,
    pub lookups: Family<OutcomeLabel, Counter>,
    pub table_primes: Gauge,
    pub table_bound: Gauge,
    pub table_build_seconds: Gauge<f64, AtomicU64>,
}

impl Metrics {
    /// Create a new metrics registry with all nthprime metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let http_request_duration = Family::<HttpLabel, Histogram, fn() -> Histogram>::new_with_constructor(
            request_duration_histogram,
        );
        registry.register(
            "nthprime_http_request_duration_seconds",
            "HTTP request latency by method and normalized path",
            http_request_duration.clone(),
        );

        let lookups = Family::<OutcomeLabel, Counter>::default();
        registry.register(
            "nthprime_lookups",
            "Ordinal lookups by outcome",
            lookups.clone(),
        );

        let table_primes = Gauge::default();
        registry.register(
            "nthprime_table_primes",
            "Number of primes in the precomputed table",
            table_primes.clone(),
        );

        let table_bound = Gauge::default();
        registry.register(
            "nthprime_table_bound",
            "Inclusive upper bound of the precomputed table",
            table_bound.clone(),
        );

        let table_build_seconds = Gauge::<f64, AtomicU64>::default();
        registry.register(
            "nthprime_table_build_seconds",
            "Wall time spent building the prime table",
            table_build_seconds.clone(),
        );

        Self {
            registry,
            http_request_duration,
            lookups,
            table_primes,
            table_bound,
            table_build_seconds,
        }
    }

    /// Count one lookup under `outcome`.
    pub fn record_lookup(&self, outcome: &str) {
        self.lookups.get_or_create(&OutcomeLabel::new(outcome)).inc();
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        if let Err(e) = encode(&mut buf, &self.registry) {
            tracing::warn!(error = %e, "failed to encode metrics");
        }
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
