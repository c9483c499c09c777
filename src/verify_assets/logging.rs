use tracing_subscriber::EnvFilter;

/// Overrides the default filter, e.g. `VERIFY_ASSETS_LOG=verify_assets=trace`.
pub const LOG_ENV: &str = "VERIFY_ASSETS_LOG";

/// Filter used when `VERIFY_ASSETS_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "verify_assets=debug"
    } else {
        "warn"
    }
}

/// Installs a stderr subscriber.
///
/// Logs go to stderr and stay quiet by default: stdout belongs to the verifier.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A subscriber already installed (tests, embedding callers) keeps precedence.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
