//! Dependency installer
//!
//! Installs the packages listed in the manifest into the activated
//! environment with `python -m pip install -r <manifest>`.

use crate::bootstrap::environment::Activation;
use crate::bootstrap::runner::{CommandRunner, Invocation, execute};
use crate::bootstrap::step::{StepKind, StepRecord};
use crate::config::{LaunchConfig, resolve_path};
use std::path::Path;

pub fn install_invocation(
    config: &LaunchConfig,
    project_dir: &Path,
    activation: &Activation,
) -> Invocation {
    Invocation::new(
        StepKind::InstallDependencies,
        activation.interpreter(),
        project_dir,
    )
    .args(["-m", "pip", "install", "-r"])
    .arg(resolve_path(project_dir, &config.launch.manifest))
    .activated(activation)
}

/// Step 3: install dependencies; failures are reported, never retried
pub async fn install_dependencies<R>(
    runner: &R,
    config: &LaunchConfig,
    project_dir: &Path,
    activation: &Activation,
) -> StepRecord
where
    R: CommandRunner + ?Sized,
{
    println!(
        "📦 Installing dependencies from {}...",
        config.launch.manifest.display()
    );

    let record = execute(runner, &install_invocation(config, project_dir, activation)).await;
    if record.status.is_failure() {
        eprintln!(
            "  ❌ Dependency installation failed (exit {})",
            record.status.exit_code()
        );
    } else {
        println!("  ✅ Dependencies installed");
    }
    record
}
