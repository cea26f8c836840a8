//! Bootstrap module: prepare and launch the backend process
//!
//! - Isolated environment creation and activation
//! - Dependency installation from the manifest
//! - Seed + serve via the environment's interpreter
//! - Pause, run report, pre-flight checks

pub mod environment;
pub mod installer;
pub mod pause;
pub mod prereq;
pub mod report;
pub mod runner;
pub mod sequence;
pub mod step;

pub use environment::{Activation, activate, ensure_environment};
pub use installer::install_dependencies;
pub use prereq::check_prerequisites;
pub use report::{LaunchReport, generate_toon_report, print_report};
pub use runner::{CommandRunner, DuctRunner, Invocation};
pub use sequence::{LaunchOptions, Launcher, PlannedStep};
pub use step::{StepExit, StepKind, StepRecord, StepStatus};
