//! Isolated environment: existence check, creation and activation
//!
//! The environment is created once with `<interpreter> -m venv <dir>` and
//! left alone on every later run. Activation does not touch the launcher's
//! own process environment; it produces the variables each later child is
//! started with.

use crate::bootstrap::runner::{CommandRunner, Invocation, execute};
use crate::bootstrap::step::{StepKind, StepRecord, StepStatus};
use crate::config::{LaunchConfig, resolve_path};
use crate::error::{ActivateSnafu, NotADirectorySnafu, Result};
use snafu::ResultExt;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Absolute location of the configured environment directory
pub fn environment_root(config: &LaunchConfig, project_dir: &Path) -> PathBuf {
    let root = resolve_path(project_dir, &config.launch.env_dir);
    std::path::absolute(&root).unwrap_or(root)
}

/// Check whether the environment directory is already present
fn environment_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        if path.is_dir() {
            Ok(true)
        } else {
            NotADirectorySnafu {
                path: path.to_path_buf(),
            }
            .fail()
        }
    } else {
        Ok(false)
    }
}

/// Command that creates the environment
pub fn creation_invocation(config: &LaunchConfig, project_dir: &Path) -> Invocation {
    Invocation::new(
        StepKind::EnsureEnvironment,
        &config.launch.interpreter,
        project_dir,
    )
    .args(["-m", "venv"])
    .arg(environment_root(config, project_dir))
}

/// Step 1: create the environment unless it already exists
pub async fn ensure_environment<R>(
    runner: &R,
    config: &LaunchConfig,
    project_dir: &Path,
) -> StepRecord
where
    R: CommandRunner + ?Sized,
{
    let env_root = environment_root(config, project_dir);

    match environment_exists(&env_root) {
        Ok(true) => {
            println!("✅ Environment exists: {}", env_root.display());
            StepRecord::new(StepKind::EnsureEnvironment, StepStatus::Existing)
                .with_detail(env_root.display().to_string())
        }
        Ok(false) => {
            println!("🔧 Creating isolated environment: {}", env_root.display());
            let record = execute(runner, &creation_invocation(config, project_dir)).await;
            if record.status.is_failure() {
                eprintln!("  ❌ Environment creation failed");
            } else {
                println!("  ✨ Created {}", env_root.display());
            }
            record
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("  ❌ {e}");
            StepRecord::new(StepKind::EnsureEnvironment, StepStatus::Failed { code: 1 })
                .with_detail(env_root.display().to_string())
        }
    }
}

/// Variables that make the environment's executables win for child processes
#[derive(Debug, Clone)]
pub struct Activation {
    env_root: PathBuf,
    bin_dir: PathBuf,
    interpreter: PathBuf,
    path_value: OsString,
}

impl Activation {
    /// Activate against an explicit base `PATH`
    pub fn new(env_root: &Path, base_path: Option<&OsString>) -> Result<Self> {
        let bin_dir = bin_dir(env_root);

        let mut entries = vec![bin_dir.clone()];
        if let Some(base) = base_path {
            entries.extend(std::env::split_paths(base));
        }
        let path_value = std::env::join_paths(entries).context(ActivateSnafu {
            path: env_root.to_path_buf(),
        })?;

        let candidate = bin_dir.join(interpreter_file_name());
        let interpreter = if candidate.is_file() {
            candidate
        } else {
            tracing::debug!(
                "{} not found, resolving python through PATH",
                candidate.display()
            );
            PathBuf::from("python")
        };

        Ok(Self {
            env_root: env_root.to_path_buf(),
            bin_dir,
            interpreter,
            path_value,
        })
    }

    /// Activate against the launcher's inherited `PATH`
    pub fn from_current(env_root: &Path) -> Result<Self> {
        let base = std::env::var_os("PATH");
        Self::new(env_root, base.as_ref())
    }

    pub fn env_root(&self) -> &Path {
        &self.env_root
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Interpreter later steps run with
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    pub fn env_vars(&self) -> Vec<(OsString, OsString)> {
        vec![
            (OsString::from("PATH"), self.path_value.clone()),
            (
                OsString::from("VIRTUAL_ENV"),
                self.env_root.clone().into_os_string(),
            ),
        ]
    }

    pub fn removed_vars(&self) -> Vec<OsString> {
        vec![OsString::from("PYTHONHOME")]
    }
}

fn bin_dir(env_root: &Path) -> PathBuf {
    if cfg!(windows) {
        env_root.join("Scripts")
    } else {
        env_root.join("bin")
    }
}

fn interpreter_file_name() -> &'static str {
    if cfg!(windows) { "python.exe" } else { "python" }
}

/// Step 2: compute the activation for the rest of the run
pub fn activate(config: &LaunchConfig, project_dir: &Path) -> (StepRecord, Option<Activation>) {
    let env_root = environment_root(config, project_dir);

    match Activation::from_current(&env_root) {
        Ok(activation) => {
            println!("⚡ Activated {}", activation.bin_dir().display());
            let record = StepRecord::new(StepKind::Activate, StepStatus::Succeeded)
                .with_detail(activation.bin_dir().display().to_string());
            (record, Some(activation))
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("  ❌ {e}");
            let record = StepRecord::new(StepKind::Activate, StepStatus::Failed { code: 1 })
                .with_detail(env_root.display().to_string());
            (record, None)
        }
    }
}
