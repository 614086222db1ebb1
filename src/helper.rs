// Copyright 2025 Steven Dee.
//
// This project is made available under a BSD-compatible license. See the
// LICENSE file in the project root for details.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::Command,
    str,
};

use zeroize::Zeroize;

use crate::{Error, Source};

/// What an askpass helper left behind after exiting.
#[derive(Debug)]
pub struct HelperOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, or `None` if the helper was killed by a signal.
    pub code: Option<i32>,
}

impl HelperOutput {
    /// Whether the helper exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl Drop for HelperOutput {
    fn drop(&mut self) {
        self.stdout.zeroize();
    }
}

/// Runs an askpass helper to completion.
///
/// Implementations must wait for the helper to exit and collect both of its output streams before
/// returning.
pub trait Runner {
    /// Runs the helper at `path` with `prompt` as its only argument.
    fn run(&mut self, path: &Path, prompt: &str) -> io::Result<HelperOutput>;
}

/// Runs the helper as a child process with the prompt as its only argument.
#[derive(Clone, Copy, Debug, Default)]
pub struct Process;

impl Runner for Process {
    fn run(&mut self, path: &Path, prompt: &str) -> io::Result<HelperOutput> {
        let mut output = Command::new(path).arg(prompt).output()?;
        Ok(HelperOutput {
            stdout: std::mem::take(&mut output.stdout),
            stderr: std::mem::take(&mut output.stderr),
            code: output.status.code(),
        })
    }
}

impl<R: Runner + ?Sized> Runner for &mut R {
    fn run(&mut self, path: &Path, prompt: &str) -> io::Result<HelperOutput> {
        (**self).run(path, prompt)
    }
}

/// Reads secrets from a GUI askpass helper.
///
/// Nothing is written to the output surface; the helper draws its own prompt.
#[derive(Debug)]
pub struct Helper<R = Process> {
    path: PathBuf,
    runner: R,
}

impl<R: Runner> Helper<R> {
    /// Creates a source that runs the helper at `path` through `runner`.
    pub fn new(path: PathBuf, runner: R) -> Self {
        Helper { path, runner }
    }
}

impl<R: Runner> Source for Helper<R> {
    fn read_secret(&mut self, _out: &mut dyn Write, prompt: &str) -> Result<String, Error> {
        log::debug!("running askpass helper {}", self.path.display());
        let output = self
            .runner
            .run(&self.path, prompt)
            .map_err(|source| Error::HelperSpawn {
                path: self.path.clone(),
                source,
            })?;
        interpret(&self.path, output)
    }
}

/// Turns a finished helper's output into a secret.
///
/// Diagnostics on standard error take precedence over an empty result when the helper failed; an
/// empty result is an error no matter how the helper exited.
fn interpret(path: &Path, output: HelperOutput) -> Result<String, Error> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !output.success() && !stderr.is_empty() {
        return Err(Error::Helper {
            path: path.to_owned(),
            message: stderr.to_owned(),
        });
    }
    let secret = str::from_utf8(&output.stdout)?.trim();
    if secret.is_empty() {
        return Err(Error::EmptyPassword);
    }
    if !output.success() {
        let message = match output.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_owned(),
        };
        return Err(Error::Helper {
            path: path.to_owned(),
            message,
        });
    }
    Ok(secret.to_owned())
}
