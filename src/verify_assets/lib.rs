//! # verify-assets
//!
//! A thin, library-first wrapper around the project's media asset verifier
//! (`tools/verify_assets.sh` by default). The verifier decides whether assets are
//! good; this crate only finds it, runs it, and reports back what it said.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Binary (main.rs, args.rs)                                  │
//! │  - Parses options, sets up logging                          │
//! │  - The ONLY place that knows about process exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Invoker (invoker.rs)                                       │
//! │  - ensure_verifier / run / verify                           │
//! │  - Relays captured output into caller-supplied sinks        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Process layer (process.rs)                                 │
//! │  - ProcessRunner trait                                      │
//! │  - SystemRunner (production), fakes (testing)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Programmatic use
//!
//! ```no_run
//! use verify_assets::config::VerifierConfig;
//!
//! let config = VerifierConfig::with_default_verifier("/srv/project");
//! let code = verify_assets::verify(&config, &["assets_pub/intro_1080p.mp4"])?;
//! std::process::exit(code);
//! # Ok::<(), verify_assets::error::VerifyError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`config`]: Project root and verifier location, with env/file layering
//! - [`invoker`]: Locating, preparing and running the verifier
//! - [`process`]: Process-spawn abstraction
//! - [`logging`]: `tracing` subscriber setup for the binary
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod invoker;
pub mod logging;
pub mod process;

use config::VerifierConfig;
use error::Result;
use invoker::Invoker;
use std::ffi::OsStr;
use std::io;

/// Runs the verifier over `inputs`, relays its output to this process's stdout and
/// stderr, and returns its exit code.
pub fn verify<S: AsRef<OsStr>>(config: &VerifierConfig, inputs: &[S]) -> Result<i32> {
    let invoker = Invoker::with_system_runner(config.clone());
    let stdout = io::stdout();
    let stderr = io::stderr();
    invoker.verify(inputs, &mut stdout.lock(), &mut stderr.lock())
}
