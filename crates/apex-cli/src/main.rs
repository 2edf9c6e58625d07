//! Apex Runner CLI
//!
//! Triggers Apex test runs in a remote org and reports their outcome.
//!
//! ```bash
//! apex run test --class-names AccountTest --result-format human --code-coverage
//! apex run test --test-level RunLocalTests --wait 10
//! apex get test --test-run-id 707000000000001
//! ```
//!
//! Exit status is 0 on success, 100 when a reported run has failing tests,
//! 130 when interrupted and 1 for any other error.

mod args;
mod commands;
mod console;
mod output;
mod reporter;
mod router;
mod signal_handler;

use args::{Cli, LogLevel};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.loglevel);

    let exit_code = router::route(cli).await;
    std::process::exit(exit_code);
}

/// Logs go to stderr so stdout stays clean for `--json`.
/// `RUST_LOG` wins over `--loglevel` when set.
fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
