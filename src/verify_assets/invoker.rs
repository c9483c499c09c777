//! # Invoker
//!
//! Locates the verifier, makes sure it can be executed, runs it with the caller's
//! inputs and hands back what it said.
//!
//! ## Outcomes
//!
//! | Situation                         | Result                                  |
//! |-----------------------------------|-----------------------------------------|
//! | verifier missing                  | `Err(VerifyError::Configuration)`       |
//! | no inputs                         | `Err(VerifyError::InvalidArgument)`     |
//! | verifier ran, any exit code       | `Ok`, code passed through               |
//! | verifier killed, no exit code     | `Ok`, code [`FALLBACK_EXIT_CODE`]       |
//! | verifier could not be launched    | `Ok`, code [`FALLBACK_EXIT_CODE`]       |
//!
//! Both error cases are raised before anything is spawned. A non-zero exit is the
//! verifier reporting bad assets, which is the normal job of this tool, so it is never
//! turned into an `Err`.
//!
//! Output is captured in full and relayed once the child has exited: stdout to the
//! caller's stdout sink, then stderr to the stderr sink.

use crate::config::VerifierConfig;
use crate::error::{Result, VerifyError};
use crate::process::{ProcessOutput, ProcessRunner, SystemRunner};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Exit code reported when the verifier produced none.
pub const FALLBACK_EXIT_CODE: i32 = 1;

/// What one verifier run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Verification {
    fn from_output(output: ProcessOutput) -> Self {
        Self {
            exit_code: output.exit_code.unwrap_or(FALLBACK_EXIT_CODE),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }

    fn launch_failure() -> Self {
        Self {
            exit_code: FALLBACK_EXIT_CODE,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Writes the captured streams to the given sinks, each exactly once.
    ///
    /// Both streams are attempted even when the first one fails; the first error wins.
    pub fn relay<O: Write, E: Write>(&self, out: &mut O, err: &mut E) -> io::Result<()> {
        let stdout_result = write_stream(out, &self.stdout);
        let stderr_result = write_stream(err, &self.stderr);
        stdout_result.and(stderr_result)
    }
}

pub struct Invoker<R: ProcessRunner> {
    config: VerifierConfig,
    runner: R,
}

impl Invoker<SystemRunner> {
    pub fn with_system_runner(config: VerifierConfig) -> Self {
        Self::new(config, SystemRunner)
    }
}

impl<R: ProcessRunner> Invoker<R> {
    pub fn new(config: VerifierConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Checks that the verifier exists and tries to mark it executable.
    ///
    /// Returns the resolved verifier path. A failed permission change is logged and
    /// dropped: the file may already be executable, and if it is not, the launch will
    /// report it.
    pub fn ensure_verifier(&self) -> Result<PathBuf> {
        let path = self.config.verifier_path();
        if !path.exists() {
            return Err(VerifyError::Configuration { path });
        }

        if let Err(e) = make_executable(&path) {
            tracing::debug!(path = %path.display(), error = %e, "could not mark verifier executable");
        }

        Ok(path)
    }

    /// Runs the verifier over `inputs` and returns its captured result without relaying it.
    pub fn run<S: AsRef<OsStr>>(&self, inputs: &[S]) -> Result<Verification> {
        let verifier = self.ensure_verifier()?;

        if inputs.is_empty() {
            return Err(VerifyError::InvalidArgument(
                "Pass at least one file. Example: verify-assets assets_pub/*".to_string(),
            ));
        }

        let args: Vec<OsString> = inputs.iter().map(|s| s.as_ref().to_os_string()).collect();
        let cwd = self.config.project_root();

        tracing::debug!(
            verifier = %verifier.display(),
            cwd = %cwd.display(),
            inputs = args.len(),
            "running verifier"
        );

        let verification = match self.runner.run(&verifier, &args, cwd) {
            Ok(output) => {
                if output.exit_code.is_none() {
                    tracing::warn!("verifier terminated without an exit code");
                }
                Verification::from_output(output)
            }
            Err(e) => {
                tracing::error!(verifier = %verifier.display(), error = %e, "failed to launch verifier");
                Verification::launch_failure()
            }
        };

        tracing::debug!(exit_code = verification.exit_code, "verifier finished");
        Ok(verification)
    }

    /// Runs the verifier, relays its output to `out` and `err`, and returns its exit code.
    ///
    /// A sink that stops accepting output (e.g. a closed pipe) is logged, not raised:
    /// the verifier's verdict is still the exit code.
    pub fn verify<S, O, E>(&self, inputs: &[S], out: &mut O, err: &mut E) -> Result<i32>
    where
        S: AsRef<OsStr>,
        O: Write,
        E: Write,
    {
        let verification = self.run(inputs)?;
        if let Err(e) = verification.relay(out, err) {
            tracing::warn!(error = %e, "could not relay verifier output");
        }
        Ok(verification.exit_code)
    }
}

fn write_stream<W: Write>(sink: &mut W, bytes: &[u8]) -> io::Result<()> {
    if bytes.is_empty() {
        return Ok(());
    }
    sink.write_all(bytes)?;
    sink.flush()
}

/// Adds the execute bits to `path`, like `chmod +x`.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    let mode = permissions.mode();
    if mode & 0o111 == 0o111 {
        return Ok(());
    }
    permissions.set_mode(mode | 0o111);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> io::Result<()> {
    fs::metadata(path).map(|_| ())
}
