//! Error types for the runtime client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Cannot connect to container runtime: {0}")]
    Unavailable(String),

    #[error("Failed to create container: {0}")]
    CreateFailed(String),

    #[error("No such container: {0}")]
    NotFound(String),

    #[error("Failed to attach to container streams: {0}")]
    AttachFailed(String),

    #[error("Inspect failed: {0}")]
    InspectFailed(String),

    #[error("Container runtime error: {0}")]
    Api(String),
}

impl RuntimeError {
    /// Whether the underlying API reported a missing container/exec target
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
