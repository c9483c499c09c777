//! # Configuration
//!
//! The Invoker never derives its paths from the environment on its own. Everything it
//! needs is carried by a [`VerifierConfig`]: the project root (which is also the
//! verifier's working directory) and the verifier location.
//!
//! The binary builds that value by layering, highest precedence first:
//!
//! 1. CLI options (`--project-root`, `--verifier`)
//! 2. Environment (`VERIFY_ASSETS_ROOT`, `VERIFY_ASSETS_VERIFIER`)
//! 3. `verify-assets.json` in the project root (verifier only)
//! 4. Defaults: the first ancestor of the current directory holding
//!    `tools/verify_assets.sh`, else the current directory
//!
//! Library users can skip all of that and call [`VerifierConfig::new`] directly.

use crate::error::{Result, VerifyError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "verify-assets.json";
pub const DEFAULT_VERIFIER: &str = "tools/verify_assets.sh";
pub const ROOT_ENV: &str = "VERIFY_ASSETS_ROOT";
pub const VERIFIER_ENV: &str = "VERIFY_ASSETS_VERIFIER";

/// On-disk settings, stored in `<project root>/verify-assets.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Verifier path, relative to the project root unless absolute
    #[serde(default = "default_verifier")]
    pub verifier: PathBuf,
}

fn default_verifier() -> PathBuf {
    PathBuf::from(DEFAULT_VERIFIER)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            verifier: default_verifier(),
        }
    }
}

impl ConfigFile {
    /// Load settings from the given directory, or return defaults if the file is absent
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILENAME);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(VerifyError::Io)?;
        let config: ConfigFile =
            serde_json::from_str(&content).map_err(VerifyError::Serialization)?;
        Ok(config)
    }
}

/// Where the verifier lives and where it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    project_root: PathBuf,
    verifier: PathBuf,
}

impl VerifierConfig {
    pub fn new(project_root: impl Into<PathBuf>, verifier: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            verifier: verifier.into(),
        }
    }

    /// Uses `tools/verify_assets.sh` under `project_root`.
    pub fn with_default_verifier(project_root: impl Into<PathBuf>) -> Self {
        Self::new(project_root, DEFAULT_VERIFIER)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The verifier path as configured, possibly relative.
    pub fn verifier(&self) -> &Path {
        &self.verifier
    }

    /// The verifier path joined onto the project root (absolute paths are kept as is).
    pub fn verifier_path(&self) -> PathBuf {
        self.project_root.join(&self.verifier)
    }
}

/// Explicit values that take precedence over the config file and the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub project_root: Option<PathBuf>,
    pub verifier: Option<PathBuf>,
}

impl Overrides {
    /// Reads `VERIFY_ASSETS_ROOT` and `VERIFY_ASSETS_VERIFIER`, ignoring empty values.
    pub fn from_env() -> Self {
        Self {
            project_root: non_empty_var(ROOT_ENV),
            verifier: non_empty_var(VERIFIER_ENV),
        }
    }

    /// Fills every unset field from `fallback`.
    pub fn or(self, fallback: Overrides) -> Self {
        Self {
            project_root: self.project_root.or(fallback.project_root),
            verifier: self.verifier.or(fallback.verifier),
        }
    }
}

fn non_empty_var(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Builds the effective configuration for a caller sitting in `cwd`.
///
/// Relative roots are anchored at `cwd` so the spawned program path never depends on
/// how the OS interprets relative paths under a changed working directory.
pub fn resolve(overrides: &Overrides, cwd: &Path) -> Result<VerifierConfig> {
    let probe = overrides
        .verifier
        .clone()
        .unwrap_or_else(default_verifier);

    let project_root = match &overrides.project_root {
        Some(root) => cwd.join(root),
        None => find_project_root(cwd, &probe).unwrap_or_else(|| cwd.to_path_buf()),
    };

    let verifier = match &overrides.verifier {
        Some(v) => v.clone(),
        None => ConfigFile::load(&project_root)?.verifier,
    };

    tracing::debug!(
        project_root = %project_root.display(),
        verifier = %verifier.display(),
        "resolved verifier config"
    );

    Ok(VerifierConfig::new(project_root, verifier))
}

/// Walks up from `start` to the first directory containing `verifier`.
pub fn find_project_root(start: &Path, verifier: &Path) -> Option<PathBuf> {
    if verifier.is_absolute() {
        return None;
    }
    start
        .ancestors()
        .find(|dir| dir.join(verifier).is_file())
        .map(Path::to_path_buf)
}
