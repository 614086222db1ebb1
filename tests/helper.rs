// Copyright 2025 Steven Dee.
//
// This project is made available under a BSD-compatible license. See the
// LICENSE file in the project root for details.

#![cfg(unix)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use askpass::{Askpass, Config, Error};
use tempfile::TempDir;

fn script(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("askpass.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A process with a display and a stderr terminal, but no stdin terminal.
fn config(helper: &Path) -> Config {
    Config {
        display: true,
        helper_override: Some(helper.to_owned()),
        search_paths: vec![],
        stderr_tty: true,
        ..Config::default()
    }
}

#[test]
fn echoing_helper() {
    let dir = tempfile::tempdir().unwrap();
    let helper = script(&dir, r#"printf '%s\n' "$1""#);
    let res = Askpass::with_config(config(&helper)).prompt("echoed secret", false, "");
    assert_eq!(res.unwrap(), "echoed secret");
}

#[test]
fn confirm_through_helper() {
    let dir = tempfile::tempdir().unwrap();
    let helper = script(&dir, "echo hunter2");
    let res = Askpass::with_config(config(&helper)).prompt("Password: ", true, "Again: ");
    assert_eq!(res.unwrap(), "hunter2");
}

#[test]
fn mismatch_runs_helper_four_times() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("calls");
    let helper = script(
        &dir,
        &format!(r#"echo x >> '{}'; printf '%s\n' "$1""#, log.display()),
    );
    let res = Askpass::with_config(config(&helper)).prompt("one", true, "two");
    assert!(matches!(res, Err(Error::TooManyTries)));
    assert_eq!(fs::read_to_string(&log).unwrap().lines().count(), 4);
}

#[test]
fn empty_helper_output() {
    let dir = tempfile::tempdir().unwrap();
    let helper = script(&dir, "exit 0");
    let res = Askpass::with_config(config(&helper)).prompt("Password: ", false, "");
    assert!(matches!(res, Err(Error::EmptyPassword)));
    assert_eq!(res.unwrap_err().to_string(), "entered empty password");
}

#[test]
fn failing_helper_reports_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let helper = script(&dir, "echo 'dialog cancelled' >&2; exit 1");
    let res = Askpass::with_config(config(&helper)).prompt("Password: ", false, "");
    match res {
        Err(Error::Helper { path, message }) => {
            assert_eq!(path, helper);
            assert_eq!(message, "dialog cancelled");
        }
        r => panic!("unexpected {r:?}"),
    }
}

#[test]
fn unrunnable_helper() {
    let dir = tempfile::tempdir().unwrap();
    let helper = dir.path().join("not-executable");
    fs::write(&helper, "").unwrap();
    let res = Askpass::with_config(config(&helper)).prompt("Password: ", false, "");
    assert!(matches!(res, Err(Error::HelperSpawn { .. })));
}
