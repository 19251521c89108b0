//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: table construction,
//! the serve loop, and the one-shot lookup commands.

use anyhow::Result;
use nthprime::{server, PrimeTable};
use std::sync::Arc;
use tracing::info;

/// Sieve the table for `bound`, logging its shape. Runs before any serving.
pub fn build_table(bound: u64) -> PrimeTable {
    info!(bound, "computing prime numbers");
    let table = PrimeTable::build(bound);
    info!(
        bound,
        count = table.len(),
        largest = table.largest(),
        elapsed_ms = table.build_duration().as_secs_f64() * 1000.0,
        "prime table ready"
    );
    table
}

pub fn run_serve(table: PrimeTable, config: &server::ServerConfig) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server::run(Arc::new(table), config))
}

pub fn run_nth(table: &PrimeTable, ordinal: i64) -> Result<()> {
    match table.nth(ordinal) {
        Some(prime) => {
            println!("{}", prime);
            Ok(())
        }
        None => anyhow::bail!(
            "no prime at position {}: there are only {} primes between 0 - {}",
            ordinal,
            table.len(),
            table.bound()
        ),
    }
}

pub fn run_stats(table: &PrimeTable) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&table.summary())?);
    Ok(())
}
