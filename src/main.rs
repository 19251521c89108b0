//! # Main — CLI Entry Point
//!
//! Builds the prime table once, synchronously, then routes to a subcommand.
//!
//! ## Subcommands
//!
//! - `serve`: start the HTTP query service.
//! - `nth <ORDINAL>`: print a single prime and exit.
//! - `stats`: print the table summary as JSON.
//!
//! ## Global Options
//!
//! - `--bound` / `PRIME_BOUND`: inclusive sieve bound (default 32767, at most 10^9).
//!
//! `LOG_FORMAT=json` switches logging to JSON lines; `RUST_LOG` filters it.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nthprime::{server, sieve};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "nthprime", about = "Serve nth-prime lookups from a precomputed sieve")]
struct Cli {
    /// Inclusive upper bound of the prime table (2 to 1000000000)
    #[arg(long, env = "PRIME_BOUND", default_value_t = sieve::DEFAULT_BOUND, value_parser = clap::value_parser!(u64).range(2..=sieve::MAX_BOUND))]
    bound: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP query service
    Serve {
        /// Address to listen on
        #[arg(long, env = "LISTEN_ADDR", default_value = server::DEFAULT_LISTEN)]
        listen: SocketAddr,
        /// Per-request timeout in seconds
        #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
        request_timeout: u64,
        /// Seconds to wait for in-flight requests after SIGINT/SIGTERM
        #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 10)]
        shutdown_grace: u64,
    },
    /// Print the Nth prime (1-based)
    Nth {
        /// Position of the prime, 1 for the smallest
        #[arg(allow_negative_numbers = true)]
        ordinal: i64,
    },
    /// Print the table summary as JSON
    Stats,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging: LOG_FORMAT=json for K8s, human-readable otherwise.
    // Both go to stderr; stdout carries `nth`/`stats` output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    let table = cli::build_table(cli.bound);

    match &cli.command {
        Commands::Serve {
            listen,
            request_timeout,
            shutdown_grace,
        } => {
            let config = server::ServerConfig {
                listen: *listen,
                request_timeout: std::time::Duration::from_secs(*request_timeout),
                shutdown_grace: std::time::Duration::from_secs(*shutdown_grace),
            };
            cli::run_serve(table, &config)
        }
        Commands::Nth { ordinal } => cli::run_nth(&table, *ordinal),
        Commands::Stats => cli::run_stats(&table),
    }
}
