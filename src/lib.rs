// Copyright 2025 Steven Dee.
//
// This project is made available under a BSD-compatible license. See the
// LICENSE file in the project root for details.

//! Interactive password prompt with optional confirmation and GUI askpass fallback.
//!
//! # Usage
//! For the common case of asking once, or twice with confirmation, use [`askpass`]:
//! ```no_run
//! use askpass::askpass;
//! let _ = askpass("Vault password", true).expect("failed reading password");
//! ```
//!
//! This shows `Vault password: ` and then `Vault password again: `. If the two entries differ,
//! the notice [`MISMATCH_NOTICE`] is shown and both are asked for again, up to [`MAX_TRIES`]
//! rounds in total.
//!
//! If you want to word the prompts yourself, use [`prompt`], which writes them verbatim:
//! ```no_run
//! use askpass::prompt;
//! let pass = prompt("New PIN: ", true, "Repeat PIN: ").unwrap();
//! # _ = pass;
//! ```
//!
//! # Where the password comes from
//! Prompts are written to standard output if it is a terminal, otherwise to standard error if
//! that is. If neither is a terminal the prompt fails with [`Error::NoTerminal`].
//!
//! When `DISPLAY` is set, an ssh-askpass style helper is used instead of the terminal: the
//! program named by `SSH_ASKPASS` if that file exists, or else the first of [`HELPER_PATHS`] that
//! is installed. The helper receives the prompt as its only argument and the password is its
//! standard output with surrounding whitespace removed.
//!
//! Without a helper the password is read with echo turned off, from standard input if it is a
//! terminal and from `/dev/tty` otherwise.
//!
//! The environment is read once by [`Config::from_env`]. To control it directly, build a
//! [`Config`] and use [`Askpass::with_config`]:
//! ```no_run
//! use askpass::{Askpass, Config};
//! let mut config = Config::from_env();
//! config.use_helper = false;
//! let pass = Askpass::with_config(config).prompt("Password: ", false, "").unwrap();
//! # _ = pass;
//! ```
//!
//! # Security
//! The password is never echoed or logged, and the helper never sees it on its command line.
//! Buffers this crate allocates along the way are zeroed; the returned [`String`] is yours to
//! clear:
//! ```no_run
//! use askpass::{Zeroize, askpass};
//! let mut pass = askpass("Password", false).unwrap();
//! // do_something_with(&pass);
//! pass.zeroize();
//! ```

use std::{io::Write, mem};

pub use zeroize::Zeroize;
use zeroize::Zeroizing;

mod config;
mod error;
mod helper;
mod tty;

pub use config::{Config, DISPLAY_VAR, HELPER_PATHS, HELPER_VAR, Surface};
pub use error::Error;
pub use helper::{Helper, HelperOutput, Process, Runner};
pub use tty::{TTY_PATH, Terminal};

/// Number of rounds of password plus confirmation before giving up.
pub const MAX_TRIES: usize = 2;

/// Written to the output surface when the confirmation does not match.
pub const MISMATCH_NOTICE: &str = "** password mismatch; try again ..\n";

/// A way of reading one secret.
pub trait Source {
    /// Shows `prompt` and reads one secret.
    ///
    /// Anything written for the user goes to `out`; the secret itself never does.
    fn read_secret(&mut self, out: &mut dyn Write, prompt: &str) -> Result<String, Error>;
}

/// Reads a secret from `source`, confirming it with a second read if `confirm` is set.
///
/// Read errors end the prompt immediately. On a mismatch [`MISMATCH_NOTICE`] is written to `out`
/// and the whole round starts over; after [`MAX_TRIES`] rounds this returns
/// [`Error::TooManyTries`].
pub fn confirm_with<S: Source + ?Sized>(
    source: &mut S,
    out: &mut dyn Write,
    prompt: &str,
    confirm: bool,
    confirm_prompt: &str,
) -> Result<String, Error> {
    for attempt in 1..=MAX_TRIES {
        let mut first = Zeroizing::new(source.read_secret(out, prompt)?);
        if !confirm {
            return Ok(mem::take(&mut *first));
        }
        let second = Zeroizing::new(source.read_secret(out, confirm_prompt)?);
        if *first == *second {
            return Ok(mem::take(&mut *first));
        }
        log::debug!("password mismatch on attempt {attempt} of {MAX_TRIES}");
        out.write_all(MISMATCH_NOTICE.as_bytes())
            .and_then(|()| out.flush())
            .map_err(Error::Write)?;
    }
    Err(Error::TooManyTries)
}

/// Password prompt bound to a [`Config`].
///
/// The runner decides how helpers are executed; [`Process`] spawns them as child processes.
#[derive(Debug)]
pub struct Askpass<R = Process> {
    config: Config,
    runner: R,
}

impl Askpass {
    /// Creates a prompt from the current process environment.
    pub fn new() -> Self {
        Askpass::with_config(Config::from_env())
    }

    /// Creates a prompt from `config`, running helpers as child processes.
    pub fn with_config(config: Config) -> Self {
        Askpass::with_runner(config, Process)
    }
}

impl Default for Askpass {
    fn default() -> Self {
        Askpass::new()
    }
}

impl<R: Runner> Askpass<R> {
    /// Creates a prompt from `config` that runs helpers through `runner`.
    pub fn with_runner(config: Config, runner: R) -> Self {
        Askpass { config, runner }
    }

    /// The configuration this prompt was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Prompts for a password, see [`confirm_with`].
    ///
    /// Fails with [`Error::NoTerminal`] before reading anything if there is no terminal to write
    /// prompts to, even when a helper would be available.
    pub fn prompt(
        &mut self,
        prompt: &str,
        confirm: bool,
        confirm_prompt: &str,
    ) -> Result<String, Error> {
        let mut out = self.config.surface()?.writer();
        self.prompt_on(&mut *out, prompt, confirm, confirm_prompt)
    }

    fn prompt_on(
        &mut self,
        out: &mut dyn Write,
        prompt: &str,
        confirm: bool,
        confirm_prompt: &str,
    ) -> Result<String, Error> {
        match self.config.helper_path() {
            Some(path) => {
                log::debug!("using askpass helper {}", path.display());
                let mut helper = Helper::new(path, &mut self.runner);
                confirm_with(&mut helper, out, prompt, confirm, confirm_prompt)
            }
            None => {
                log::debug!("no askpass helper, reading from the terminal");
                let mut terminal =
                    Terminal::new(self.config.stdin_tty).device(self.config.tty_path.clone());
                confirm_with(&mut terminal, out, prompt, confirm, confirm_prompt)
            }
        }
    }
}

/// Prompts for a password using the process environment.
///
/// `prompt` and, when `confirm` is set, `confirm_prompt` are shown exactly as given.
pub fn prompt(prompt: &str, confirm: bool, confirm_prompt: &str) -> Result<String, Error> {
    Askpass::new().prompt(prompt, confirm, confirm_prompt)
}

/// Prompts for a password as `"{prompt}: "`, confirming with `"{prompt} again: "` if `confirm` is
/// set.
pub fn askpass(prompt: &str, confirm: bool) -> Result<String, Error> {
    let confirm_prompt = format!("{prompt} again: ");
    let prompt = format!("{prompt}: ");
    crate::prompt(&prompt, confirm, &confirm_prompt)
}
