//! The launch sequence
//!
//! Seven steps, strictly in order, one path:
//! ensure environment, activate, install, database notice, seed, serve,
//! pause. A failing step halts the run with its exit code, except the seed
//! step whose outcome never gates the server. The launcher's exit code is
//! the exit code of the last step that ran a command.

use crate::bootstrap::environment::{
    Activation, activate, creation_invocation, ensure_environment, environment_root,
};
use crate::bootstrap::installer::{install_dependencies, install_invocation};
use crate::bootstrap::pause::pause;
use crate::bootstrap::report::{LaunchReport, print_report};
use crate::bootstrap::runner::{CommandRunner, Invocation, execute};
use crate::bootstrap::step::{StepKind, StepRecord, StepStatus};
use crate::config::{LaunchConfig, PausePolicy, resolve_path};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Per-run switches layered over the config
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub skip_install: bool,
    pub skip_seed: bool,
    /// Overrides `[launch] pause` when set
    pub pause: Option<PausePolicy>,
}

/// One line of a dry-run plan
#[derive(Debug, Clone)]
pub struct PlannedStep {
    pub kind: StepKind,
    pub description: String,
}

pub struct Launcher<R> {
    runner: R,
    config: LaunchConfig,
    project_dir: PathBuf,
    options: LaunchOptions,
}

impl<R: CommandRunner> Launcher<R> {
    /// A relative `project_dir` is anchored to the current directory here,
    /// since children run with the project dir as their cwd
    pub fn new(runner: R, config: LaunchConfig, project_dir: &Path) -> Self {
        let project_dir =
            std::path::absolute(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
        Self {
            runner,
            config,
            project_dir,
            options: LaunchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: LaunchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn pause_policy(&self) -> PausePolicy {
        self.options.pause.unwrap_or(self.config.launch.pause)
    }

    fn seed_invocation(&self, activation: &Activation) -> Invocation {
        Invocation::new(StepKind::Seed, activation.interpreter(), &self.project_dir)
            .arg(resolve_path(&self.project_dir, &self.config.launch.seed_script))
            .activated(activation)
    }

    fn serve_invocation(&self, activation: &Activation) -> Invocation {
        Invocation::new(StepKind::Serve, activation.interpreter(), &self.project_dir)
            .arg(resolve_path(&self.project_dir, &self.config.launch.entry_point))
            .activated(activation)
    }

    fn database_notice(&self) -> StepRecord {
        let database = &self.config.database;
        let message = format!(
            "Make sure {} is running on {}",
            database.label,
            database.address()
        );
        println!("⚠️  {message}");
        tracing::info!("{message}");
        StepRecord::new(StepKind::DatabaseNotice, StepStatus::Advisory).with_detail(message)
    }

    /// Describe what `run` would do without doing it
    pub fn plan(&self) -> Result<Vec<PlannedStep>> {
        let env_root = environment_root(&self.config, &self.project_dir);
        let activation = Activation::from_current(&env_root)?;
        let skip_note = |flag: &str| format!("skipped ({flag})");

        let ensure = if env_root.is_dir() {
            format!("keep existing {}", env_root.display())
        } else {
            creation_invocation(&self.config, &self.project_dir).command_line()
        };
        let install = if self.options.skip_install {
            skip_note("--skip-install")
        } else {
            install_invocation(&self.config, &self.project_dir, &activation).command_line()
        };
        let seed = if self.options.skip_seed {
            skip_note("--skip-seed")
        } else {
            self.seed_invocation(&activation).command_line()
        };
        let database = &self.config.database;

        Ok(vec![
            PlannedStep {
                kind: StepKind::EnsureEnvironment,
                description: ensure,
            },
            PlannedStep {
                kind: StepKind::Activate,
                description: format!("prepend {} to PATH", activation.bin_dir().display()),
            },
            PlannedStep {
                kind: StepKind::InstallDependencies,
                description: install,
            },
            PlannedStep {
                kind: StepKind::DatabaseNotice,
                description: format!("remind: {} on {}", database.label, database.address()),
            },
            PlannedStep {
                kind: StepKind::Seed,
                description: seed,
            },
            PlannedStep {
                kind: StepKind::Serve,
                description: self.serve_invocation(&activation).command_line(),
            },
            PlannedStep {
                kind: StepKind::Pause,
                description: format!("{:?}", self.pause_policy()).to_lowercase(),
            },
        ])
    }

    /// Steps 1-6; returns the exit code of the last step that ran
    async fn run_steps(&self, steps: &mut Vec<StepRecord>) -> i32 {
        let record = ensure_environment(&self.runner, &self.config, &self.project_dir).await;
        if let Some(code) = settle(steps, record) {
            return code;
        }

        let (record, activation) = activate(&self.config, &self.project_dir);
        if let Some(code) = settle(steps, record) {
            return code;
        }
        let Some(activation) = activation else {
            return 1;
        };

        let record = if self.options.skip_install {
            println!("⏭️  Skipping dependency installation");
            skipped(StepKind::InstallDependencies, "--skip-install")
        } else {
            install_dependencies(&self.runner, &self.config, &self.project_dir, &activation).await
        };
        if let Some(code) = settle(steps, record) {
            return code;
        }

        steps.push(self.database_notice());

        let record = if self.options.skip_seed {
            println!("⏭️  Skipping seed step");
            skipped(StepKind::Seed, "--skip-seed")
        } else {
            println!("🌱 Seeding initial data...");
            let record = execute(&self.runner, &self.seed_invocation(&activation)).await;
            if let StepStatus::Failed { code } = record.status {
                tracing::warn!(code, "seed step failed, starting server anyway");
                eprintln!("  ⚠️  Seed step exited with {code}; continuing");
            }
            record
        };
        if let Some(code) = settle(steps, record) {
            return code;
        }

        println!("🚀 Starting {}...", self.config.launch.entry_point.display());
        let record = execute(&self.runner, &self.serve_invocation(&activation)).await;
        let code = record.status.exit_code();
        tracing::info!(code, "main process exited");
        steps.push(record);
        code
    }

    /// Run the full sequence, print the summary, then pause
    pub async fn run(&self) -> LaunchReport {
        let mut report = self.execute_steps().await;
        self.hold_console(&mut report).await;
        report
    }

    /// Steps 1-6 and the summary, without the pause
    pub async fn execute_steps(&self) -> LaunchReport {
        let mut report = LaunchReport::new(&self.project_dir);
        report.exit_code = self.run_steps(&mut report.steps).await;
        print_report(&report);
        report
    }

    /// Step 7; never changes the exit code
    pub async fn hold_console(&self, report: &mut LaunchReport) {
        report.steps.push(pause(self.pause_policy()).await);
    }

    /// Steps 1-2 only
    pub async fn prepare_environment(&self) -> LaunchReport {
        let mut report = LaunchReport::new(&self.project_dir);

        let record = ensure_environment(&self.runner, &self.config, &self.project_dir).await;
        if let Some(code) = settle(&mut report.steps, record) {
            report.exit_code = code;
            return report;
        }

        let (record, _) = activate(&self.config, &self.project_dir);
        report.exit_code = settle(&mut report.steps, record).unwrap_or(0);
        report
    }
}

/// Record a step; returns the exit code when its failure stops the sequence
fn settle(steps: &mut Vec<StepRecord>, record: StepRecord) -> Option<i32> {
    let halt = record.status.is_failure() && record.kind.halts_on_failure();
    let code = record.status.exit_code();
    steps.push(record);
    halt.then_some(code)
}

fn skipped(kind: StepKind, flag: &str) -> StepRecord {
    StepRecord::new(
        kind,
        StepStatus::Skipped {
            reason: flag.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::runner::DuctRunner;

    #[test]
    fn test_plan_lists_every_step_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = Launcher::new(DuctRunner, LaunchConfig::default(), dir.path());
        let plan = launcher.plan().unwrap();

        let kinds: Vec<_> = plan.iter().map(|step| step.kind).collect();
        assert_eq!(kinds, StepKind::ALL.to_vec());
        assert!(plan[0].description.contains("-m venv"));
        assert!(plan[2].description.contains("pip install -r"));
        assert!(plan[3].description.contains("MongoDB on localhost:27017"));
        assert!(plan[5].description.ends_with("main.py"));
    }

    #[test]
    fn test_plan_honours_skips_and_existing_env() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("venv")).unwrap();
        let launcher = Launcher::new(DuctRunner, LaunchConfig::default(), dir.path())
            .with_options(LaunchOptions {
                skip_install: true,
                skip_seed: true,
                pause: Some(PausePolicy::Never),
            });
        let plan = launcher.plan().unwrap();

        assert!(plan[0].description.starts_with("keep existing"));
        assert_eq!(plan[2].description, "skipped (--skip-install)");
        assert_eq!(plan[4].description, "skipped (--skip-seed)");
        assert_eq!(plan[6].description, "never");
    }

    #[test]
    fn test_relative_project_dir_is_made_absolute() {
        let launcher = Launcher::new(DuctRunner, LaunchConfig::default(), Path::new("proj"));
        let expected = std::env::current_dir().unwrap().join("proj");
        assert_eq!(launcher.project_dir(), expected.as_path());

        let plan = launcher.plan().unwrap();
        let install = &plan[2].description;
        let manifest = expected.join("requirements.txt");
        assert!(
            install.ends_with(&*manifest.to_string_lossy()),
            "{install}"
        );
        let serve = &plan[5].description;
        assert!(
            serve.ends_with(&*expected.join("main.py").to_string_lossy()),
            "{serve}"
        );
    }

    #[test]
    fn test_pause_override() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = Launcher::new(DuctRunner, LaunchConfig::default(), dir.path());
        assert_eq!(launcher.pause_policy(), PausePolicy::Auto);

        let launcher = launcher.with_options(LaunchOptions {
            pause: Some(PausePolicy::Always),
            ..LaunchOptions::default()
        });
        assert_eq!(launcher.pause_policy(), PausePolicy::Always);
    }
}
