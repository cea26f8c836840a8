//! Pre-flight checks for `launch3r check`
//!
//! Validates that the interpreter is installed with a new enough version and
//! that the manifest, seed script and entry point exist. The database probe
//! is informational only and never fails the check.

use crate::config::{LaunchConfig, resolve_path};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result of the interpreter check
#[derive(Debug)]
pub struct BinaryCheck {
    pub name: String,
    pub found: bool,
    pub installed_version: Option<String>,
    pub required_version: String,
    pub meets_requirement: bool,
    pub path: Option<PathBuf>,
}

/// Presence of one collaborator file
#[derive(Debug)]
pub struct FileCheck {
    pub role: &'static str,
    pub path: PathBuf,
    pub found: bool,
}

#[derive(Debug)]
pub struct DatabaseProbe {
    pub label: String,
    pub address: String,
    pub reachable: bool,
}

/// Overall prerequisite check result
#[derive(Debug)]
pub struct PrereqResult {
    pub interpreter: BinaryCheck,
    pub files: Vec<FileCheck>,
    pub database: DatabaseProbe,
    pub all_required_met: bool,
}

impl PrereqResult {
    pub fn missing_files(&self) -> Vec<&FileCheck> {
        self.files.iter().filter(|f| !f.found).collect()
    }
}

/// Check if binary exists in PATH
fn find_binary(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let locator = if cfg!(windows) { "where" } else { "which" };
    let output = duct::cmd(locator, [name])
        .stdout_capture()
        .stderr_null()
        .unchecked()
        .run()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8(output.stdout)
        .ok()
        .and_then(|s| s.lines().next().map(|line| PathBuf::from(line.trim())))
}

/// Get version of binary by running `<binary> --version`
fn get_version(name: &str) -> Option<String> {
    // Older interpreters print their version on stderr
    let output = duct::cmd(name, ["--version"])
        .stderr_to_stdout()
        .stdout_capture()
        .unchecked()
        .run()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let version_output = String::from_utf8(output.stdout).ok()?;
    extract_version(&version_output)
}

/// Extract semantic version from version output
///   "Python 3.11.4" -> "3.11.4"
///   "Python 3.13.0rc1" -> "3.13.0"
fn extract_version(output: &str) -> Option<String> {
    let re = regex::Regex::new(r"v?(\d+\.\d+\.\d+)").ok()?;
    re.captures(output)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Check if installed version meets requirement like ">=3.8.0"
fn version_meets_requirement(installed: &str, requirement: &str) -> Result<bool> {
    let requirement = requirement.trim();

    let (op, required_ver_str) = [">=", "<=", ">", "<", "="]
        .iter()
        .find_map(|op| requirement.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("=", requirement));

    let installed_ver = semver::Version::parse(installed.trim())
        .with_context(|| format!("Failed to parse installed version: {installed}"))?;

    let required_ver = semver::Version::parse(required_ver_str.trim())
        .with_context(|| format!("Failed to parse required version: {required_ver_str}"))?;

    Ok(match op {
        ">=" => installed_ver >= required_ver,
        "<=" => installed_ver <= required_ver,
        ">" => installed_ver > required_ver,
        "<" => installed_ver < required_ver,
        _ => installed_ver == required_ver,
    })
}

fn check_interpreter(name: &str, requirement: &str) -> BinaryCheck {
    let path = find_binary(name);
    let found = path.is_some();

    let (installed_version, meets_requirement) = if found {
        match get_version(name) {
            Some(version) => {
                let meets = version_meets_requirement(&version, requirement).unwrap_or_else(|e| {
                    tracing::warn!("{e:#}");
                    false
                });
                (Some(version), meets)
            }
            // 🤓 Binary found but version unknown - assume OK
            None => (Some("unknown".to_string()), true),
        }
    } else {
        (None, false)
    };

    BinaryCheck {
        name: name.to_string(),
        found,
        installed_version,
        required_version: requirement.to_string(),
        meets_requirement,
        path,
    }
}

fn check_files(config: &LaunchConfig, project_dir: &Path) -> Vec<FileCheck> {
    [
        ("manifest", &config.launch.manifest),
        ("seed script", &config.launch.seed_script),
        ("entry point", &config.launch.entry_point),
    ]
    .into_iter()
    .map(|(role, path)| {
        let path = resolve_path(project_dir, path);
        FileCheck {
            role,
            found: path.is_file(),
            path,
        }
    })
    .collect()
}

async fn probe_database(config: &LaunchConfig) -> DatabaseProbe {
    let address = config.database.address();
    let timeout = Duration::from_millis(config.check.probe_timeout_ms);

    let reachable = matches!(
        tokio::time::timeout(timeout, tokio::net::TcpStream::connect(&address)).await,
        Ok(Ok(_))
    );
    tracing::debug!(%address, reachable, "database probe");

    DatabaseProbe {
        label: config.database.label.clone(),
        address,
        reachable,
    }
}

/// Check all prerequisites for launching the project
pub async fn check_prerequisites(config: &LaunchConfig, project_dir: &Path) -> PrereqResult {
    let interpreter = check_interpreter(
        &config.launch.interpreter,
        &config.check.min_interpreter_version,
    );
    let files = check_files(config, project_dir);
    let database = probe_database(config).await;

    let all_required_met = interpreter.found
        && interpreter.meets_requirement
        && files.iter().all(|f| f.found);

    PrereqResult {
        interpreter,
        files,
        database,
        all_required_met,
    }
}

/// Print check results to stdout
pub fn print_prereq_result(result: &PrereqResult) {
    println!("🥾 launch3r Pre-flight Check");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("📦 Interpreter:");
    let bin = &result.interpreter;
    let status = if bin.found && bin.meets_requirement {
        "✅"
    } else if bin.found {
        "⚠️"
    } else {
        "❌"
    };
    print!("  {} {} ", status, bin.name);
    if let Some(ref installed) = bin.installed_version {
        print!("(installed: {installed}");
        if bin.meets_requirement {
            println!(", OK)");
        } else {
            println!(", requires: {}) ⚠️", bin.required_version);
        }
    } else {
        println!("(not installed) - requires: {}", bin.required_version);
    }

    println!();
    println!("📁 Files:");
    for file in &result.files {
        let status = if file.found { "✅" } else { "❌" };
        println!("  {} {}: {}", status, file.role, file.path.display());
    }

    println!();
    println!("🔌 Database (informational):");
    let db = &result.database;
    if db.reachable {
        println!("  ✅ {} accepting connections on {}", db.label, db.address);
    } else {
        println!("  ℹ️  {} not reachable on {}", db.label, db.address);
    }

    println!();
    if result.all_required_met {
        println!("✅ All required prerequisites met!");
    } else {
        println!("⚠️  Some required prerequisites are missing");
    }
}
