use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error(
        "Verifier not found at {}. Move your verifier script into tools/ then chmod +x.",
        path.display()
    )]
    Configuration { path: PathBuf },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VerifyError>;
