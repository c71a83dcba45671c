use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrientError {
    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to initialize recognition engine: {0}")]
    EngineInit(String),

    #[error("Recognition failed: {0}")]
    EngineFailure(String),

    #[error("I/O failure: {0}")]
    IoFailure(String),
}

impl OrientError {
    /// Stable identifier for log output and machine-readable reports.
    pub fn code(&self) -> &'static str {
        match self {
            OrientError::NotFound(_) => "NOT_FOUND",
            OrientError::EngineInit(_) => "ENGINE_INIT",
            OrientError::EngineFailure(_) => "ENGINE_FAILURE",
            OrientError::IoFailure(_) => "IO_FAILURE",
        }
    }
}
