//! Step vocabulary shared by the sequence, the runner and the report

use std::fmt;
use std::process::ExitStatus;

/// Exit code reported when a step's program could not be started at all
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// The seven launch steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    EnsureEnvironment,
    Activate,
    InstallDependencies,
    DatabaseNotice,
    Seed,
    Serve,
    Pause,
}

impl StepKind {
    pub const ALL: [StepKind; 7] = [
        StepKind::EnsureEnvironment,
        StepKind::Activate,
        StepKind::InstallDependencies,
        StepKind::DatabaseNotice,
        StepKind::Seed,
        StepKind::Serve,
        StepKind::Pause,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::EnsureEnvironment => "ensure_environment",
            StepKind::Activate => "activate",
            StepKind::InstallDependencies => "install_dependencies",
            StepKind::DatabaseNotice => "database_notice",
            StepKind::Seed => "seed",
            StepKind::Serve => "serve",
            StepKind::Pause => "pause",
        }
    }

    /// Whether a failure of this step stops the sequence
    pub fn halts_on_failure(self) -> bool {
        !matches!(self, StepKind::Seed)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Exit status of a child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepExit {
    /// `None` when the child was terminated by a signal
    pub code: Option<i32>,
}

impl StepExit {
    pub fn code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Code to propagate as the launcher's own status
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }
}

impl From<ExitStatus> for StepExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    /// Environment directory was already present, nothing was run
    Existing,
    Failed { code: i32 },
    Skipped { reason: String },
    /// Printed text only
    Advisory,
}

impl StepStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepStatus::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::Succeeded => "succeeded",
            StepStatus::Existing => "existing",
            StepStatus::Failed { .. } => "failed",
            StepStatus::Skipped { .. } => "skipped",
            StepStatus::Advisory => "advisory",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            StepStatus::Failed { code } => *code,
            _ => 0,
        }
    }
}

/// Outcome of one executed step
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub kind: StepKind,
    pub status: StepStatus,
    /// Command line or message associated with the step
    pub detail: Option<String>,
}

impl StepRecord {
    pub fn new(kind: StepKind, status: StepStatus) -> Self {
        Self {
            kind,
            status,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
