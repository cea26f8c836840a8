//! Child process execution
//!
//! `CommandRunner` is the seam between the launch sequence and the OS.
//! `DuctRunner` runs each invocation through duct with inherited stdio on
//! tokio's blocking pool, so the sequence awaits one child at a time.

use crate::bootstrap::environment::Activation;
use crate::bootstrap::step::{SPAWN_FAILURE_CODE, StepExit, StepKind, StepRecord, StepStatus};
use crate::error::{JoinSnafu, Result, SpawnSnafu};
use async_trait::async_trait;
use snafu::ResultExt;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A fully described child process for one step
#[derive(Debug, Clone)]
pub struct Invocation {
    pub step: StepKind,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
    pub env: Vec<(OsString, OsString)>,
    pub env_remove: Vec<OsString>,
}

impl Invocation {
    pub fn new(step: StepKind, program: impl Into<PathBuf>, cwd: &Path) -> Self {
        Self {
            step,
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            env: Vec::new(),
            env_remove: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Apply the environment's activation variables to this child
    #[must_use]
    pub fn activated(mut self, activation: &Activation) -> Self {
        self.env.extend(activation.env_vars());
        self.env_remove.extend(activation.removed_vars());
        self
    }

    /// Look up a variable this invocation sets
    pub fn env_value(&self, name: &str) -> Option<&OsString> {
        self.env
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Command line as an operator would type it
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the child to completion and report how it exited
    async fn run(&self, invocation: &Invocation) -> Result<StepExit>;
}

/// Real runner backed by duct
#[derive(Debug, Default, Clone, Copy)]
pub struct DuctRunner;

impl DuctRunner {
    fn expression(invocation: &Invocation) -> duct::Expression {
        // A `Path` program is taken as relative to cwd; an `OsStr` gets a PATH lookup
        let mut expression = duct::cmd(invocation.program.as_os_str(), &invocation.args)
            .dir(&invocation.cwd)
            // Non-zero exits are step outcomes, not errors
            .unchecked();

        for name in &invocation.env_remove {
            expression = expression.env_remove(name);
        }
        for (name, value) in &invocation.env {
            expression = expression.env(name, value);
        }

        expression
    }
}

#[async_trait]
impl CommandRunner for DuctRunner {
    async fn run(&self, invocation: &Invocation) -> Result<StepExit> {
        let command_line = invocation.command_line();
        tracing::debug!(step = %invocation.step, cwd = %invocation.cwd.display(), "spawning {command_line}");

        let expression = Self::expression(invocation);
        let output = tokio::task::spawn_blocking(move || expression.run())
            .await
            .context(JoinSnafu {
                program: command_line.clone(),
            })?
            .context(SpawnSnafu {
                program: command_line,
            })?;

        let exit = StepExit::from(output.status);
        tracing::debug!(step = %invocation.step, code = ?exit.code, "child exited");
        Ok(exit)
    }
}

/// Run one step's child and turn the outcome into a record
///
/// A child that cannot be started fails the step with `SPAWN_FAILURE_CODE`.
pub async fn execute<R>(runner: &R, invocation: &Invocation) -> StepRecord
where
    R: CommandRunner + ?Sized,
{
    let command_line = invocation.command_line();
    let status = match runner.run(invocation).await {
        Ok(exit) if exit.success() => StepStatus::Succeeded,
        Ok(exit) => StepStatus::Failed {
            code: exit.exit_code(),
        },
        Err(e) => {
            tracing::error!(step = %invocation.step, "{e}");
            eprintln!("  ❌ {e}");
            StepStatus::Failed {
                code: SPAWN_FAILURE_CODE,
            }
        }
    };

    StepRecord::new(invocation.step, status).with_detail(command_line)
}
