use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the menu front-end and its persisted files.
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("INI error: {0}")]
    Ini(#[from] ini::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(String),

    /// The state file does not start with a well-formed PNG screenshot
    #[error("Malformed state file: {0}")]
    MalformedState(String),

    /// The state file ends before the core's serialized state does
    #[error("State data truncated: expected {expected} bytes, got {actual}")]
    TruncatedState { expected: usize, actual: usize },

    #[error("Button config is empty: {0}")]
    EmptyButtonConfig(PathBuf),

    /// The core refused an operation
    #[error("Core error: {0}")]
    Core(String),

    #[error("Failed to load core library: {0}")]
    Library(#[from] libloading::Error),

    #[error("No frame has been rendered yet")]
    NoFrame,

    #[error("No game loaded")]
    NoGame,
}

impl FrontendError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedState(msg.into())
    }

    pub fn core(msg: impl Into<String>) -> Self {
        Self::Core(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FrontendError>;
