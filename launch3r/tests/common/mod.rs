//! Stand-in interpreter shared by the binary tests
#![cfg(unix)]
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Logs its arguments; `-m venv DIR` copies itself into `DIR/bin/python`,
/// the seed script fails with 2 and the entry point exits with 4.
/// A manifest or script path that does not exist from the child's cwd is
/// logged as `MISSING` and exits 9.
pub const FAKE_PYTHON: &str = r#"#!/bin/sh
echo "$*" >> "$LAUNCH3R_TEST_LOG"
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
    mkdir -p "$3/bin" && cp "$0" "$3/bin/python" && chmod +x "$3/bin/python"
    exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ]; then
    if [ ! -f "$5" ]; then echo "MISSING $5" >> "$LAUNCH3R_TEST_LOG"; exit 9; fi
    exit "${FAKE_PIP_EXIT:-0}"
fi
if [ ! -f "$1" ]; then echo "MISSING $1" >> "$LAUNCH3R_TEST_LOG"; exit 9; fi
case "$1" in
    *seed_data.py) exit 2 ;;
    *main.py) echo "VIRTUAL_ENV=$VIRTUAL_ENV" >> "$LAUNCH3R_TEST_LOG"; exit 4 ;;
esac
exit 0
"#;

pub fn install_fake_python(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, FAKE_PYTHON).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// The collaborator files every run hands to the interpreter
pub fn write_project_files(project: &Path) {
    for name in ["requirements.txt", "seed_data.py", "main.py"] {
        fs::write(project.join(name), "").unwrap();
    }
}

/// `launch3r` with none of its own environment overrides leaking in
pub fn launch3r(log: &Path) -> Command {
    let mut cmd = Command::cargo_bin("launch3r").unwrap();
    cmd.env_remove("LAUNCH3R_PROJECT")
        .env_remove("LAUNCH3R_CONFIG")
        .env_remove("LAUNCH3R_PYTHON")
        .env_remove("MONGODB_URL")
        .env("LAUNCH3R_TEST_LOG", log);
    cmd
}
