// Copyright 2025 Steven Dee.
//
// This project is made available under a BSD-compatible license. See the
// LICENSE file in the project root for details.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use zeroize::Zeroizing;

use crate::{Error, Source};

/// Initial capacity of the line buffer; longer passwords still work but may leave an unzeroed copy
/// behind when the buffer grows.
const PASSWORD_LEN: usize = 256;

/// Path of the controlling terminal.
pub const TTY_PATH: &str = "/dev/tty";

/// Reads secrets from the terminal with echo turned off.
///
/// Standard input is used if it is a terminal, otherwise the terminal device ([`TTY_PATH`] unless
/// changed with [`Terminal::device`]) is opened for each read and closed again before the read
/// returns. Terminal input is taken verbatim up to the end of the line; unlike helper output it is
/// not trimmed.
///
/// Echo is restored when the read ends, but not if the process is killed by a signal in the
/// middle of it; a Ctrl-C during the prompt leaves echo off. Callers that care should restore the
/// terminal from their own signal handling.
#[derive(Clone, Debug)]
pub struct Terminal {
    stdin_tty: bool,
    device: PathBuf,
}

impl Terminal {
    /// Creates a source that reads from standard input if `stdin_tty`, else from [`TTY_PATH`].
    pub fn new(stdin_tty: bool) -> Self {
        Terminal {
            stdin_tty,
            device: PathBuf::from(TTY_PATH),
        }
    }

    /// Opens `device` instead of [`TTY_PATH`] when standard input is not a terminal.
    pub fn device(mut self, device: PathBuf) -> Self {
        self.device = device;
        self
    }
}

impl Source for Terminal {
    #[cfg(unix)]
    fn read_secret(&mut self, out: &mut dyn Write, prompt: &str) -> Result<String, Error> {
        use std::{fs::OpenOptions, io::BufReader, os::fd::AsRawFd};

        if self.stdin_tty {
            log::debug!("reading password from stdin");
            let stdin = io::stdin();
            let fd = stdin.as_raw_fd();
            prompt_line(out, prompt, || {
                let _echo = sys::EchoOff::new(fd)?;
                read_line(&mut stdin.lock())
            })
        } else {
            log::debug!("reading password from {}", self.device.display());
            let tty = OpenOptions::new()
                .read(true)
                .write(true)
                .open(&self.device)
                .map_err(Error::TtyOpen)?;
            let fd = tty.as_raw_fd();
            prompt_line(out, prompt, || {
                let _echo = sys::EchoOff::new(fd)?;
                read_line(&mut BufReader::new(&tty))
            })
        }
    }

    #[cfg(not(unix))]
    fn read_secret(&mut self, _out: &mut dyn Write, _prompt: &str) -> Result<String, Error> {
        Err(io::Error::from(io::ErrorKind::Unsupported).into())
    }
}

/// Shows `prompt` on `out`, runs `read`, then writes the newline that the muted Enter key did not.
///
/// The newline is written whether or not `read` succeeded.
pub(crate) fn prompt_line(
    out: &mut dyn Write,
    prompt: &str,
    read: impl FnOnce() -> io::Result<Zeroizing<Vec<u8>>>,
) -> Result<String, Error> {
    write_flush(out, prompt.as_bytes())?;
    let line = read();
    write_flush(out, b"\n")?;
    Ok(std::str::from_utf8(&line?)?.to_owned())
}

fn write_flush(out: &mut dyn Write, bytes: &[u8]) -> Result<(), Error> {
    out.write_all(bytes)
        .and_then(|()| out.flush())
        .map_err(Error::Write)
}

/// Reads one line, without its terminator.
///
/// End of input before any byte is an error; end of input after some bytes ends the line.
pub(crate) fn read_line<R: BufRead + ?Sized>(input: &mut R) -> io::Result<Zeroizing<Vec<u8>>> {
    let mut buf = Zeroizing::new(Vec::with_capacity(PASSWORD_LEN));
    if input.read_until(b'\n', &mut buf)? == 0 {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(buf)
}

#[cfg(unix)]
mod sys {
    use std::{io, mem::MaybeUninit, os::fd::RawFd};

    /// Keeps echo disabled on a terminal until dropped.
    pub(super) struct EchoOff {
        fd: RawFd,
        saved: libc::termios,
    }

    impl EchoOff {
        pub(super) fn new(fd: RawFd) -> io::Result<Self> {
            let mut term = MaybeUninit::<libc::termios>::uninit();
            // SAFETY: `term` is valid for writes of one `termios`.
            if unsafe { libc::tcgetattr(fd, term.as_mut_ptr()) } != 0 {
                return Err(io::Error::last_os_error());
            }
            // SAFETY: `tcgetattr` succeeded, so it filled in `term`.
            let saved = unsafe { term.assume_init() };
            let mut quiet = saved;
            quiet.c_lflag &= !(libc::ECHO | libc::ECHONL);
            // SAFETY: `quiet` is a fully initialized `termios`.
            if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &quiet) } != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(EchoOff { fd, saved })
        }
    }

    impl Drop for EchoOff {
        fn drop(&mut self) {
            // SAFETY: `saved` was read from this same descriptor, which outlives `self`.
            if unsafe { libc::tcsetattr(self.fd, libc::TCSAFLUSH, &self.saved) } != 0 {
                log::warn!(
                    "failed to restore terminal echo: {}",
                    io::Error::last_os_error()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs::File, io::Cursor};

    /// Accepts nothing.
    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn line(input: &[u8]) -> io::Result<Vec<u8>> {
        read_line(&mut Cursor::new(input)).map(|b| b.to_vec())
    }

    #[test]
    fn strips_terminator() {
        assert_eq!(line(b"hunter2\n").unwrap(), b"hunter2");
        assert_eq!(line(b"hunter2\r\n").unwrap(), b"hunter2");
        assert_eq!(line(b"hunter2").unwrap(), b"hunter2");
        assert_eq!(line(b"\n").unwrap(), b"");
    }

    #[test]
    fn keeps_inner_whitespace() {
        assert_eq!(line(b"  two words \n").unwrap(), b"  two words ");
    }

    #[test]
    fn eof_is_error() {
        let e = line(b"").unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn stops_at_first_line() {
        let mut input = Cursor::new(&b"first\nsecond\n"[..]);
        assert_eq!(*read_line(&mut input).unwrap(), b"first");
        assert_eq!(*read_line(&mut input).unwrap(), b"second");
    }

    #[test]
    fn newline_written_after_failed_read() {
        let mut out = Vec::new();
        let res = prompt_line(&mut out, "Password: ", || {
            Err(io::ErrorKind::Interrupted.into())
        });
        assert!(matches!(res, Err(Error::Read(e)) if e.kind() == io::ErrorKind::Interrupted));
        assert_eq!(out, b"Password: \n");
    }

    #[test]
    fn prompt_then_newline() {
        let mut out = Vec::new();
        let res = prompt_line(&mut out, "Password: ", || {
            read_line(&mut Cursor::new(&b"hunter2\n"[..]))
        });
        assert_eq!(res.unwrap(), "hunter2");
        assert_eq!(out, b"Password: \n");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let res = prompt_line(&mut Vec::new(), "Password: ", || {
            read_line(&mut Cursor::new(&b"\xff\xfe\n"[..]))
        });
        assert!(matches!(res, Err(Error::Utf8(_))));
    }

    #[test]
    fn write_failure_is_not_a_read_failure() {
        let mut read = false;
        let res = prompt_line(&mut Closed, "Password: ", || {
            read = true;
            read_line(&mut Cursor::new(&b"hunter2\n"[..]))
        });
        assert!(matches!(res, Err(Error::Write(e)) if e.kind() == io::ErrorKind::BrokenPipe));
        assert!(!read);
    }

    #[cfg(unix)]
    #[test]
    fn missing_device_fails_before_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let mut terminal = Terminal::new(false).device(dir.path().join("tty"));
        let mut out = Vec::new();
        let res = terminal.read_secret(&mut out, "Password: ");
        assert!(matches!(res, Err(Error::TtyOpen(e)) if e.kind() == io::ErrorKind::NotFound));
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn device_that_is_not_a_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let device = dir.path().join("tty");
        File::create(&device).unwrap();
        let mut terminal = Terminal::new(false).device(device);
        let mut out = Vec::new();
        let res = terminal.read_secret(&mut out, "Password: ");
        assert!(matches!(res, Err(Error::Read(_))));
        assert_eq!(out, b"Password: \n");
    }
}
