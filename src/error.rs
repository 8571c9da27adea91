use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoctestError {
    #[error("Compiler not found at {}\nPlease build the project first.", .0.display())]
    CompilerNotFound(PathBuf),

    #[error("Cannot read examples directory {}: {err}", path.display())]
    ExamplesDir { path: PathBuf, err: std::io::Error },

    #[error("Command '{} {}' timed out after {} seconds", compiler.display(), source_file.display(), timeout.as_secs_f64())]
    Timeout {
        compiler: PathBuf,
        source_file: PathBuf,
        timeout: Duration,
    },

    #[error("Failed to launch {}: {err}", compiler.display())]
    Spawn { compiler: PathBuf, err: std::io::Error },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for LoctestError {
    fn from(err: anyhow::Error) -> Self {
        LoctestError::Other(err.to_string())
    }
}

/// Result type for loctest crate
pub type Result<T> = std::result::Result<T, LoctestError>;
