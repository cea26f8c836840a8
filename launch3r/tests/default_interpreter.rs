//! Default interpreter looked up on PATH, project given relative to the cwd
//!
//! Its own test binary with a single test, for the same ETXTBSY reason as
//! `end_to_end.rs`.
#![cfg(unix)]

mod common;

use common::{install_fake_python, launch3r, write_project_files};
use std::ffi::OsString;
use std::fs;

#[test]
fn bare_interpreter_name_and_relative_project() {
    let work = tempfile::tempdir().unwrap();
    let bin = work.path().join("bin");
    let project = work.path().join("proj");
    fs::create_dir_all(&bin).unwrap();
    fs::create_dir_all(&project).unwrap();
    install_fake_python(&bin, "python3");
    write_project_files(&project);
    let log = work.path().join("calls.log");

    let mut path = OsString::from(&bin);
    if let Some(inherited) = std::env::var_os("PATH") {
        path.push(":");
        path.push(inherited);
    }

    let output = launch3r(&log)
        .current_dir(work.path())
        .env("PATH", path)
        .args(["run", "--no-pause", "-p", "proj"])
        .output()
        .unwrap();

    let calls = fs::read_to_string(&log).unwrap();
    assert_eq!(output.status.code(), Some(4), "{calls}");
    assert!(!calls.contains("MISSING"), "{calls}");
    assert!(project.join("venv/bin/python").is_file());

    let lines: Vec<_> = calls.lines().collect();
    assert_eq!(lines.len(), 5, "{calls}");
    assert!(lines[0].starts_with("-m venv /"), "{calls}");
    assert!(lines[0].ends_with("proj/venv"), "{calls}");
    assert!(lines[2].starts_with('/'), "{calls}");
    assert!(lines[2].ends_with("proj/seed_data.py"), "{calls}");
    assert!(lines[3].ends_with("proj/main.py"), "{calls}");
}
