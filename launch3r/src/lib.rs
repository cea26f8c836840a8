//! # launch3r
//!
//! Bootstrap launcher for a Python backend: ensures an isolated environment,
//! installs the dependency manifest, prints the database reminder, seeds
//! initial data, starts the server and holds the console open afterwards.
//!
//! The launch sequence is driven through [`bootstrap::CommandRunner`], so the
//! same [`bootstrap::Launcher`] runs real children via duct or a recording
//! runner in tests.

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use bootstrap::{LaunchOptions, LaunchReport, Launcher};
pub use config::LaunchConfig;
pub use error::LaunchError;
