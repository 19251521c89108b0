//! # Prime Table — Immutable Ordinal Lookup
//!
//! Owns the list of primes produced once by [`sieve::segmented_sieve`] and
//! answers "what is the Nth prime?" against it. A `PrimeTable` is built before
//! the server starts and shared behind an `Arc`; it has no interior mutability,
//! so concurrent readers need no locking.

use crate::sieve;
use serde::Serialize;
use std::time::{Duration, Instant};

/// The ordered primes in `[2, bound]`, built once.
#[derive(Debug, Clone)]
pub struct PrimeTable {
    bound: u64,
    primes: Vec<u64>,
    build_duration: Duration,
}

/// Serializable snapshot of a table's shape, exposed over HTTP and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub bound: u64,
    pub count: usize,
    pub largest: Option<u64>,
    pub segment_size: u64,
    pub build_micros: u64,
}

impl PrimeTable {
    /// Sieve every prime up to and including `bound` (at most [`sieve::MAX_BOUND`]).
    pub fn build(bound: u64) -> Self {
        let bound = bound.min(sieve::MAX_BOUND);
        let start = Instant::now();
        let primes = sieve::segmented_sieve(bound);
        Self {
            bound,
            primes,
            build_duration: start.elapsed(),
        }
    }

    /// The `ordinal`-th prime, 1-based. `None` for `ordinal <= 0` or past the end.
    pub fn nth(&self, ordinal: i64) -> Option<u64> {
        let index = usize::try_from(ordinal).ok()?.checked_sub(1)?;
        self.primes.get(index).copied()
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// Largest prime `<= bound`.
    pub fn largest(&self) -> Option<u64> {
        self.primes.last().copied()
    }

    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    pub fn build_duration(&self) -> Duration {
        self.build_duration
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            bound: self.bound,
            count: self.len(),
            largest: self.largest(),
            segment_size: sieve::segment_size(self.bound),
            build_micros: self.build_duration.as_micros().min(u64::MAX as u128) as u64,
        }
    }
}
