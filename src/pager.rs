//! Where `scrum get` writes: a pager process or plain stdout.
//!
//! The pager is `$PAGER` when set, otherwise the first of `less` and `more`
//! that can be spawned.  `less` gets `LESS=FRX` unless the user already has a
//! `LESS` of their own, so one-screen output does not need a keypress.

use std::{
    env,
    io::{self, Write},
    process::{Child, ChildStdin, Command, Stdio},
};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PagerError {
    #[error("no pager could be started (tried {tried})")]
    NotFound { tried: String },

    #[error("pager exited unsuccessfully: {0}")]
    Exit(std::process::ExitStatus),

    #[error(transparent)]
    Io(#[from] io::Error),
}

// ─── Pager ────────────────────────────────────────────────────────────────────

pub struct Pager {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl Pager {
    /// Spawn the first pager that starts.
    pub fn open() -> Result<Self, PagerError> {
        let candidates = candidates(env::var("PAGER").ok().as_deref());
        for argv in &candidates {
            let Some((prog, args)) = argv.split_first() else {
                continue;
            };
            let mut cmd = Command::new(prog);
            cmd.args(args).stdin(Stdio::piped());
            if prog == "less" && env::var_os("LESS").is_none() {
                cmd.env("LESS", "FRX");
            }
            match cmd.spawn() {
                Ok(mut child) => {
                    debug!(pager = %prog, "opened pager");
                    let stdin = child.stdin.take();
                    return Ok(Self { child, stdin });
                },
                Err(e) => debug!(pager = %prog, error = %e, "pager unavailable"),
            }
        }
        Err(PagerError::NotFound {
            tried: candidates
                .iter()
                .map(|c| c.join(" "))
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Close the pager's input and block until the user quits it.
    pub fn wait(mut self) -> Result<(), PagerError> {
        drop(self.stdin.take());
        let status = self.child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(PagerError::Exit(status))
        }
    }
}

impl Write for Pager {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Ok(buf.len());
        };
        match stdin.write(buf) {
            // The user quit the pager early; discard the rest.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                self.stdin = None;
                Ok(buf.len())
            },
            other => other,
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stdin.as_mut().map(Write::flush) {
            Some(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                self.stdin = None;
                Ok(())
            },
            Some(result) => result,
            None => Ok(()),
        }
    }
}

/// Pager command lines to try, in order.
fn candidates(pager_env: Option<&str>) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    if let Some(cmdline) = pager_env {
        let argv: Vec<String> = cmdline.split_whitespace().map(str::to_string).collect();
        if !argv.is_empty() {
            out.push(argv);
        }
    }
    out.push(vec!["less".into()]);
    out.push(vec!["more".into()]);
    out
}

// ─── Output ───────────────────────────────────────────────────────────────────

/// Destination for `get` output.
pub enum Output {
    Pager(Pager),
    Stdout(io::Stdout),
}

impl Output {
    /// Open a pager when asked to and stdout is a terminal; stdout otherwise.
    pub fn open(use_pager: bool) -> Result<Self, PagerError> {
        if use_pager && console::Term::stdout().is_term() {
            Ok(Self::Pager(Pager::open()?))
        } else {
            Ok(Self::Stdout(io::stdout()))
        }
    }

    /// Flush and, for a pager, wait for it to exit.
    pub fn finish(self) -> Result<(), PagerError> {
        match self {
            Self::Pager(pager) => pager.wait(),
            Self::Stdout(mut out) => Ok(out.flush()?),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Pager(p) => p.write(buf),
            Self::Stdout(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Pager(p) => p.flush(),
            Self::Stdout(s) => s.flush(),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
