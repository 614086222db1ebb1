// Copyright 2025 Steven Dee.
//
// This project is made available under a BSD-compatible license. See the
// LICENSE file in the project root for details.

use std::{io, path::PathBuf, str::Utf8Error};

/// Errors that can occur while prompting for a password.
///
/// Every variant aborts the prompt; no secret is returned alongside an error. Only a
/// confirmation mismatch is retried, and running out of retries is [`Error::TooManyTries`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Neither standard output nor standard error is attached to a terminal, so there is nowhere
    /// to show the prompt.
    #[error("neither stdout nor stderr is a terminal")]
    NoTerminal,
    /// Standard input is not a terminal and `/dev/tty` could not be opened.
    #[error("error allocating terminal: {0}")]
    TtyOpen(#[source] io::Error),
    /// The askpass helper could not be started.
    #[error("failed to run {}: {source}", path.display())]
    HelperSpawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The askpass helper exited unsuccessfully.
    ///
    /// `message` is the helper's standard error, or its exit status if it wrote nothing there.
    #[error("{}: {message}", path.display())]
    Helper { path: PathBuf, message: String },
    /// The askpass helper produced no output.
    #[error("entered empty password")]
    EmptyPassword,
    /// Writing a prompt, newline, or notice to the output surface failed.
    #[error("failed writing prompt: {0}")]
    Write(#[source] io::Error),
    /// Reading from the terminal failed, including end of input before anything was typed.
    #[error("failed reading password: {0}")]
    Read(#[from] io::Error),
    /// The entered password was not UTF-8.
    #[error("password is not valid UTF-8")]
    Utf8(#[from] Utf8Error),
    /// The confirmation never matched within [`MAX_TRIES`](crate::MAX_TRIES) attempts.
    #[error("too many tries getting password")]
    TooManyTries,
}
