// Copyright 2025 Steven Dee.
//
// This project is made available under a BSD-compatible license. See the
// LICENSE file in the project root for details.

#![allow(deprecated)] // cargo_bin! macro doesn't exist yet in assert_cmd 2.1

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn fails_without_terminal() {
    // Both output streams are pipes under assert_cmd.
    Command::cargo_bin("askpass")
        .unwrap()
        .arg("--confirm")
        .env("DISPLAY", ":0")
        .write_stdin("hunter2\nhunter2\n")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::eq(
            "askpass: neither stdout nor stderr is a terminal\n",
        ));
}

#[test]
fn rejects_unknown_flag() {
    Command::cargo_bin("askpass")
        .unwrap()
        .arg("--echo")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}
