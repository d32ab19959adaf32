//! Container runtime client for mwdd
//!
//! This crate provides an abstraction over the container runtime's control
//! plane (create, start, attach, exec, inspect) with a bollard-backed
//! implementation. One client is constructed per session; it is cheap to
//! build and stateless between calls.

mod docker;
mod error;
mod types;

pub use docker::DockerRuntime;
pub use error::*;
pub use types::*;

use async_trait::async_trait;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncWrite};

/// Control-plane operations needed to run one interactive session.
///
/// Implementations only need to be safe for independent concurrent calls
/// (attach vs. inspect); a session never shares its client with another.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Create a container; nothing is started
    async fn create_container(&self, config: &ContainerConfig) -> Result<ContainerId>;

    /// Start a previously created container
    async fn start_container(&self, id: &ContainerId) -> Result<()>;

    /// Attach to a container's TTY-framed standard streams
    async fn attach_container(&self, id: &ContainerId) -> Result<AttachedStream>;

    /// Whether the container's main process is still running
    async fn container_running(&self, id: &ContainerId) -> Result<bool>;

    /// Create an exec context in a running container, identified by name
    async fn create_exec(&self, container: &str, config: &ExecConfig) -> Result<ExecId>;

    /// Start an exec context and attach to its streams
    async fn start_exec(&self, id: &ExecId) -> Result<AttachedStream>;

    /// Whether the exec context's process is still running
    async fn exec_running(&self, id: &ExecId) -> Result<bool>;
}

/// Duplex byte channel to a remote process under TTY framing.
///
/// The runtime multiplexes stdin/stdout/stderr into one stream when a TTY
/// is allocated; `output` carries the combined remote output and `input`
/// feeds the remote stdin.
pub struct AttachedStream {
    pub input: Pin<Box<dyn AsyncWrite + Send>>,
    pub output: Pin<Box<dyn AsyncRead + Send>>,
}
