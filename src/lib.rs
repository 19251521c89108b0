pub mod prom_metrics;
pub mod server;
pub mod sieve;
pub mod table;

pub use table::{PrimeTable, TableSummary};
