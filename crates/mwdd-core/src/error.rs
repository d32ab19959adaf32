//! Error types for mwdd-core

use thiserror::Error;

/// What went wrong with a session, for callers that dispatch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container control plane could not be reached
    RuntimeUnavailable,
    /// The remote process could not be created or started
    CreateFailed,
    /// An ExistingService target has no matching running container
    ServiceNotRunning,
    /// The stream attach was rejected
    AttachFailed,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RuntimeUnavailable => write!(f, "runtime unavailable"),
            Self::CreateFailed => write!(f, "create failed"),
            Self::ServiceNotRunning => write!(f, "service not running"),
            Self::AttachFailed => write!(f, "attach failed"),
        }
    }
}

/// Fatal session failure: a kind plus the human-readable message
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SessionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] mwdd_config::ConfigError),

    #[error("Session failed: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid session spec: {0}")]
    InvalidSpec(String),

    #[error("{program} {command} exited with status {status}")]
    CommandFailed {
        program: String,
        command: String,
        status: i32,
    },

    #[error("Failed to determine home directory")]
    NoHomeDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
