//! Library error type
//!
//! Step failures are not errors: they are recorded as `StepStatus::Failed`
//! and become the exit code. `LaunchError` covers everything that stops the
//! launcher from getting as far as running a step.

use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LaunchError {
    #[snafu(display("Failed to read {}", path.display()))]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to parse {}", path.display()))]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[snafu(display("Failed to execute: {program}"))]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("Blocking task for {program} did not complete"))]
    Join {
        program: String,
        source: tokio::task::JoinError,
    },

    #[snafu(display("Cannot build PATH for environment {}", path.display()))]
    Activate {
        path: PathBuf,
        source: std::env::JoinPathsError,
    },

    #[snafu(display("Path exists but is not a directory: {}", path.display()))]
    NotADirectory { path: PathBuf },

    #[snafu(display("Failed to write report to {}", path.display()))]
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Failed to interact with the console"))]
    Console { source: std::io::Error },
}

pub type Result<T, E = LaunchError> = std::result::Result<T, E>;
