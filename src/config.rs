// Copyright 2025 Steven Dee.
//
// This project is made available under a BSD-compatible license. See the
// LICENSE file in the project root for details.

use std::{
    env,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
};

use crate::{Error, TTY_PATH};

/// Well-known install locations of GUI askpass helpers, searched in order.
pub const HELPER_PATHS: &[&str] = &[
    "/usr/lib/openssh/gnome-ssh-askpass",
    "/usr/bin/ksshaskpass",
    "/usr/bin/lxqt-openssh-askpass",
    "/usr/libexec/openssh/lxqt-openssh-askpass",
    "/usr/bin/ssh-askpass-fullscreen",
    "/usr/lib/ssh/x11-ssh-askpass",
];

/// Environment variable whose presence indicates a graphical session.
pub const DISPLAY_VAR: &str = "DISPLAY";

/// Environment variable naming a helper that takes precedence over [`HELPER_PATHS`].
pub const HELPER_VAR: &str = "SSH_ASKPASS";

/// Where prompts are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl Surface {
    /// Returns a locked writer for this stream.
    pub fn writer(self) -> Box<dyn io::Write> {
        match self {
            Surface::Stdout => Box::new(io::stdout().lock()),
            Surface::Stderr => Box::new(io::stderr().lock()),
        }
    }
}

/// Everything [`Askpass`](crate::Askpass) needs to know about its environment.
///
/// [`Config::from_env`] takes a snapshot of the process environment; after that nothing is looked
/// up again, so a `Config` built by hand fully determines which output surface and which input
/// channel are used.
///
/// [`Config::default`] describes a process with no terminals and no display, searching the
/// standard [`HELPER_PATHS`].
#[derive(Clone, Debug)]
pub struct Config {
    /// A graphical display is available.
    pub display: bool,
    /// Helper named by [`HELPER_VAR`], if set.
    pub helper_override: Option<PathBuf>,
    /// Fallback helper locations, checked in order.
    pub search_paths: Vec<PathBuf>,
    /// Allow delegating to a helper at all.
    pub use_helper: bool,
    /// Terminal device opened when standard input is not a terminal.
    pub tty_path: PathBuf,
    /// Standard input is a terminal.
    pub stdin_tty: bool,
    /// Standard output is a terminal.
    pub stdout_tty: bool,
    /// Standard error is a terminal.
    pub stderr_tty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display: false,
            helper_override: None,
            search_paths: HELPER_PATHS.iter().map(PathBuf::from).collect(),
            use_helper: true,
            tty_path: PathBuf::from(TTY_PATH),
            stdin_tty: false,
            stdout_tty: false,
            stderr_tty: false,
        }
    }
}

impl Config {
    /// Reads [`DISPLAY_VAR`] and [`HELPER_VAR`] and probes the three standard streams.
    pub fn from_env() -> Self {
        Config {
            display: env::var_os(DISPLAY_VAR).is_some_and(|v| !v.is_empty()),
            helper_override: env::var_os(HELPER_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            stdin_tty: io::stdin().is_terminal(),
            stdout_tty: io::stdout().is_terminal(),
            stderr_tty: io::stderr().is_terminal(),
            ..Config::default()
        }
    }

    /// Picks standard output if it is a terminal, else standard error if it is.
    pub fn surface(&self) -> Result<Surface, Error> {
        if self.stdout_tty {
            Ok(Surface::Stdout)
        } else if self.stderr_tty {
            Ok(Surface::Stderr)
        } else {
            Err(Error::NoTerminal)
        }
    }

    /// Resolves the askpass helper to run, if any.
    ///
    /// Returns `None` without touching the filesystem when there is no display or helpers are
    /// disabled. Otherwise the override wins if it names an existing file, and then the first
    /// existing entry of the search list.
    pub fn helper_path(&self) -> Option<PathBuf> {
        if !self.display || !self.use_helper {
            return None;
        }
        self.helper_override
            .iter()
            .chain(&self.search_paths)
            .find(|p| is_file(p))
            .cloned()
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().is_ok_and(|m| m.is_file())
}
