//! Shared test helpers for integration tests.

#![allow(dead_code)]

use nthprime::server::{self, AppState};
use nthprime::{sieve, PrimeTable};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// The default-bound table, sieved once per test binary.
pub fn default_table() -> Arc<PrimeTable> {
    static TABLE: OnceLock<Arc<PrimeTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(PrimeTable::build(sieve::DEFAULT_BOUND)))
        .clone()
}

/// Build an Axum test app router over the default-bound table.
pub fn build_test_app() -> axum::Router {
    build_test_app_with(default_table())
}

/// Build an Axum test app router over an arbitrary table.
pub fn build_test_app_with(table: Arc<PrimeTable>) -> axum::Router {
    server::build_router(AppState::new(table), Duration::from_secs(10))
}
