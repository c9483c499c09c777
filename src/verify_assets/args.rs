use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use verify_assets::config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "verify-assets", version)]
#[command(
    about = "Run the project's media asset verifier over the given files",
    long_about = "Run the project's media asset verifier over the given files.\n\n\
                  Options are only read before the first file; everything after it \
                  is passed to the verifier untouched. The exit status is the \
                  verifier's own."
)]
pub struct Cli {
    /// Project root (defaults to the nearest ancestor holding tools/verify_assets.sh)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Verifier path, relative to the project root unless absolute
    #[arg(long, value_name = "PATH")]
    pub verifier: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Files (or shell-expanded globs) to verify
    #[arg(
        value_name = "FILE",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub inputs: Vec<OsString>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            project_root: self.project_root.clone(),
            verifier: self.verifier.clone(),
        }
    }
}
