//! CLI binary for `tasknote_bridge`.
//!
//! This binary is a thin wrapper that parses arguments and delegates to the library.

use clap::Parser;
use std::process::ExitCode;
use tasknote_bridge::cli::{self, Cli};
use tasknote_bridge::config::BridgeConfig;
use tasknote_bridge::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_default() {
        eprintln!("Warning: logging init failed: {e}");
    }
    logging::install_panic_hook();

    let config = match BridgeConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = cli::run(cli, &config).await;
    for line in &outcome.lines {
        if outcome.success {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }
    outcome.exit_code()
}
