//! # Process Spawning
//!
//! The Invoker never talks to `std::process` directly. It goes through
//! [`ProcessRunner`], which turns "run this program with these arguments in this
//! directory" into a [`ProcessOutput`].
//!
//! A non-zero exit is data here: `run` only returns `Err` when the process could not
//! be started at all. Whatever the child does after that, including dying to a signal,
//! comes back as `Ok`.
//!
//! - Production: [`SystemRunner`]
//! - Testing: any fake that records calls (see the invoker tests)

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Everything a finished child left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the child was terminated without an exit code (e.g. by a signal).
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn new(
        exit_code: Option<i32>,
        stdout: impl Into<Vec<u8>>,
        stderr: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

pub trait ProcessRunner {
    /// Runs `program` to completion with `args`, in `cwd`, capturing both output streams.
    fn run(&self, program: &Path, args: &[OsString], cwd: &Path) -> io::Result<ProcessOutput>;
}

/// Spawns real processes and blocks until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[OsString], cwd: &Path) -> io::Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
