//! Run reports
//!
//! A human summary printed at the end of every run, and an optional Toon
//! (Token-Oriented Object Notation, TOML-flavoured tabular arrays) file
//! written with `--report <path>`.

use crate::bootstrap::step::{StepKind, StepRecord, StepStatus};
use crate::error::{Result, WriteReportSnafu};
use chrono::Utc;
use snafu::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a launch did, in order
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub timestamp: String,
    pub project: PathBuf,
    pub steps: Vec<StepRecord>,
    pub exit_code: i32,
}

impl LaunchReport {
    pub fn new(project: &Path) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            project: project.to_path_buf(),
            steps: Vec::new(),
            exit_code: 0,
        }
    }

    pub fn record(&self, kind: StepKind) -> Option<&StepRecord> {
        self.steps.iter().find(|step| step.kind == kind)
    }

    pub fn failed_steps(&self) -> Vec<&StepRecord> {
        self.steps
            .iter()
            .filter(|step| step.status.is_failure())
            .collect()
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Serialize launch report to Toon format
pub fn serialize_to_toon(report: &LaunchReport) -> String {
    let mut toon = String::new();

    toon.push_str("# launch3r Run Report\n\n");
    toon.push_str("[meta]\n");
    toon.push_str(&format!("timestamp = {}\n", quote(&report.timestamp)));
    toon.push_str("format = \"toon\"\n");
    toon.push_str(&format!(
        "project = {}\n\n",
        quote(&report.project.display().to_string())
    ));

    toon.push_str("[summary]\n");
    toon.push_str(&format!("exit_code = {}\n", report.exit_code));
    toon.push_str(&format!("steps_executed = {}\n", report.steps.len()));
    toon.push_str(&format!("steps_failed = {}\n\n", report.failed_steps().len()));

    for step in &report.steps {
        toon.push_str("[[steps]]\n");
        toon.push_str(&format!("name = {}\n", quote(step.kind.as_str())));
        toon.push_str(&format!("status = {}\n", quote(step.status.label())));

        match &step.status {
            StepStatus::Failed { code } => {
                toon.push_str(&format!("exit_code = {code}\n"));
            }
            StepStatus::Skipped { reason } => {
                toon.push_str(&format!("reason = {}\n", quote(reason)));
            }
            _ => {}
        }

        if let Some(ref detail) = step.detail {
            toon.push_str(&format!("detail = {}\n", quote(detail)));
        }

        toon.push('\n');
    }

    toon
}

/// Write the Toon report, creating parent directories; `~` is expanded
pub fn generate_toon_report(report: &LaunchReport, output_path: &Path) -> Result<PathBuf> {
    let raw = output_path.to_string_lossy();
    let final_path = PathBuf::from(shellexpand::tilde(&raw).as_ref());

    if let Some(parent) = final_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WriteReportSnafu {
                path: final_path.clone(),
            })?;
        }
    }

    fs::write(&final_path, serialize_to_toon(report)).context(WriteReportSnafu {
        path: final_path.clone(),
    })?;

    Ok(final_path)
}

/// Print report to stdout in human-readable format
pub fn print_report(report: &LaunchReport) {
    println!();
    println!("🥾 launch3r Run Report");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Generated: {}", report.timestamp);
    println!("Project:   {}", report.project.display());
    println!();

    for step in &report.steps {
        let icon = match step.status {
            StepStatus::Succeeded | StepStatus::Existing => "✅",
            StepStatus::Failed { .. } => "❌",
            StepStatus::Skipped { .. } => "⏭️ ",
            StepStatus::Advisory => "ℹ️ ",
        };

        print!("  {} {} ", icon, step.kind);
        match &step.status {
            StepStatus::Failed { code } => println!("(exit {code})"),
            StepStatus::Skipped { reason } => println!("(skipped: {reason})"),
            status => println!("({})", status.label()),
        }
    }

    println!();
    if report.exit_code == 0 {
        println!("✅ Exit code 0");
    } else {
        println!("⚠️  Exit code {}", report.exit_code);
    }
}
