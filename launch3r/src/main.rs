//! launch3r entry point
//!
//! Exits with the code of the last step that ran, or 1 when the launcher
//! itself fails before reaching a step.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use launch3r::cli::Cli;
use launch3r::commands::handle_launch_command;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let code = match handle_launch_command(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e:#}");
            eprintln!("❌ {e:#}");
            1
        }
    };

    std::process::exit(code);
}

/// Initialize tracing subscriber (verbose mode sets debug level)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
