//! Binary crate for the `phonebook` terminal app.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering the page and resolving confirmations

use clap::Parser;

mod cli;
mod page;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Structured logs go to stderr, filtered by `RUST_LOG` (default `warn`).
fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
