//! Interactive container session engine
//!
//! A session attaches the local terminal to a process inside a container,
//! either by exec-ing into a running compose service or by creating a fresh
//! auto-removed container. Three activities run concurrently while the
//! session is active: the stdin relay, the output relay, and the lifecycle
//! poller that watches for the remote process to end.

mod guard;
mod launcher;
mod poller;
mod pump;

pub use guard::RawModeGuard;
#[cfg(any(test, feature = "test-support"))]
pub(crate) use guard::RawTerm;
pub use launcher::SESSION_DNS;
pub use poller::{LifecyclePoller, DEFAULT_POLL_INTERVAL};
pub use pump::StreamPump;

use crate::{CoreError, ErrorKind, Result, SessionError};
use launcher::SessionLauncher;
use mwdd_runtime::{AttachedStream, BindMount, ContainerId, ContainerRuntime, ExecId};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};

/// What the session runs in: an existing compose service, or a container
/// created for this one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTarget {
    /// Exec into the first replica of a running compose service
    ExistingService { service: String },
    /// Create and start a fresh auto-removed container
    NewContainer { image: String, suffix: String },
}

/// Immutable description of what one session runs
#[derive(Debug, Clone)]
pub struct SessionSpec {
    pub target: SessionTarget,
    pub command: Vec<String>,
    pub working_dir: Option<String>,
    pub user: Option<String>,
    pub tty: bool,
    pub mounts: Vec<BindMount>,
}

impl SessionSpec {
    /// Spec for exec-ing into an existing compose service
    pub fn exec_into(service: impl Into<String>) -> SessionSpecBuilder {
        SessionSpecBuilder::new(SessionTarget::ExistingService {
            service: service.into(),
        })
    }

    /// Spec for a one-off container created for this session
    pub fn new_container(image: impl Into<String>, suffix: impl Into<String>) -> SessionSpecBuilder {
        SessionSpecBuilder::new(SessionTarget::NewContainer {
            image: image.into(),
            suffix: suffix.into(),
        })
    }
}

/// Builder threading explicit parameters into a SessionSpec
#[derive(Debug, Clone)]
pub struct SessionSpecBuilder {
    target: SessionTarget,
    command: Vec<String>,
    working_dir: Option<String>,
    user: Option<String>,
    tty: bool,
    mounts: Vec<BindMount>,
}

impl SessionSpecBuilder {
    fn new(target: SessionTarget) -> Self {
        Self {
            target,
            command: Vec::new(),
            working_dir: None,
            user: None,
            tty: true,
            mounts: Vec::new(),
        }
    }

    /// The command to run; the first element is the executable
    pub fn command(mut self, command: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// "uid:gid" or username; when unset the container's configured user runs
    pub fn user(mut self, user: impl Into<String>) -> Self {
        let user = user.into();
        if !user.is_empty() {
            self.user = Some(user);
        }
        self
    }

    /// Bind-mount a host path at the same path inside the container
    pub fn mount_in_place(mut self, path: impl Into<String>) -> Self {
        self.mounts.push(BindMount::in_place(path));
        self
    }

    pub fn build(self) -> Result<SessionSpec> {
        if self.command.is_empty() {
            return Err(CoreError::InvalidSpec(
                "session command must not be empty".to_string(),
            ));
        }
        Ok(SessionSpec {
            target: self.target,
            command: self.command,
            working_dir: self.working_dir,
            user: self.user,
            tty: self.tty,
            mounts: self.mounts,
        })
    }
}

/// Handle to the remote process, valid until it is reaped
#[derive(Debug, Clone)]
pub enum RemoteProcess {
    Container(ContainerId),
    Exec(ExecId),
}

/// Outcome of one session; remote output was streamed live, never captured
#[derive(Debug)]
pub struct SessionResult {
    pub exited_normally: bool,
    pub error: Option<SessionError>,
}

impl SessionResult {
    fn closed() -> Self {
        Self {
            exited_normally: true,
            error: None,
        }
    }

    fn aborted(error: SessionError) -> Self {
        Self {
            exited_normally: false,
            error: Some(error),
        }
    }

    /// Convert into a plain result for callers that treat an aborted
    /// session as a fatal error
    pub fn into_result(self) -> Result<()> {
        match self.error {
            None => Ok(()),
            Some(e) => Err(CoreError::Session(e)),
        }
    }
}

/// Deterministic name of the first replica of a compose service
pub fn service_container_name(project: &str, service: &str) -> String {
    format!("{}_{}_1", project, service)
}

/// Name for one-off session containers
pub fn custom_container_name(project: &str, suffix: &str) -> String {
    format!("{}-custom_{}", project, suffix)
}

/// Network that session containers join to reach the compose services.
/// Must be kept in sync with the docker-compose files.
pub fn compose_network_name(project: &str) -> String {
    format!("{}_dps", project)
}

/// Runs interactive sessions against one compose project
pub struct SessionRunner {
    runtime: Arc<dyn ContainerRuntime>,
    project: String,
    poll_interval: Duration,
}

impl SessionRunner {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, project: impl Into<String>) -> Self {
        Self {
            runtime,
            project: project.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run one session attached to the local terminal.
    ///
    /// Streams remote output live to stdout and relays stdin to the remote
    /// process until the lifecycle poller sees the process end. The terminal
    /// is restored on every exit path.
    pub async fn run_interactive_session(&self, spec: &SessionSpec) -> SessionResult {
        let guard = RawModeGuard::for_stdin();
        self.run_session(spec, guard, tokio::io::stdin(), tokio::io::stdout())
            .await
    }

    /// Like [`run_interactive_session`](Self::run_interactive_session) but
    /// with an explicit guard and local streams, for non-terminal callers
    pub async fn run_session<I, O>(
        &self,
        spec: &SessionSpec,
        mut term: RawModeGuard,
        local_in: I,
        local_out: O,
    ) -> SessionResult
    where
        I: AsyncRead + Send + Unpin + 'static,
        O: AsyncWrite + Send + Unpin + 'static,
    {
        // Launching: create the remote process (no side effect on failure)
        let launcher = SessionLauncher::new(self.runtime.as_ref(), &self.project);
        let process = match launcher.launch(spec).await {
            Ok(process) => process,
            Err(e) => return Self::abort(term, e),
        };

        // Attaching: obtain the stream, then set the remote process running
        let stream = match self.attach(&process).await {
            Ok(stream) => stream,
            Err(e) => return Self::abort(term, e),
        };

        // Active: raw mode before the pump, so keystrokes pass through
        // unprocessed from the first byte
        term.engage();
        let _pump = StreamPump::start(stream, local_in, local_out);
        LifecyclePoller::new(self.runtime.as_ref(), self.poll_interval)
            .wait_for_exit(&process)
            .await;

        // Draining: restore the terminal; the pump tasks wind down on their
        // own as their streams close and are not joined
        term.restore();
        SessionResult::closed()
    }

    async fn attach(&self, process: &RemoteProcess) -> std::result::Result<AttachedStream, SessionError> {
        match process {
            RemoteProcess::Exec(id) => self
                .runtime
                .start_exec(id)
                .await
                .map_err(|e| SessionError::new(ErrorKind::AttachFailed, e.to_string())),
            RemoteProcess::Container(id) => {
                let stream = self
                    .runtime
                    .attach_container(id)
                    .await
                    .map_err(|e| SessionError::new(ErrorKind::AttachFailed, e.to_string()))?;
                if let Err(e) = self.runtime.start_container(id).await {
                    // Create succeeded but start failed: the container is
                    // not auto-removed and stays behind
                    tracing::warn!(
                        "Container {} was created but failed to start and may be left behind",
                        id
                    );
                    return Err(SessionError::new(
                        ErrorKind::CreateFailed,
                        format!(
                            "container {} created but failed to start (it may be left behind): {}",
                            id, e
                        ),
                    ));
                }
                Ok(stream)
            }
        }
    }

    fn abort(mut term: RawModeGuard, error: SessionError) -> SessionResult {
        term.restore();
        SessionResult::aborted(error)
    }
}
