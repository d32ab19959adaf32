//! Mock container runtime for testing session flows without a daemon

use crate::session::{RawModeGuard, RawTerm};
use async_trait::async_trait;
use mwdd_runtime::{
    AttachedStream, ContainerConfig, ContainerId, ContainerRuntime, ExecConfig, ExecId,
    Result, RuntimeError,
};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded call against the mock, with the fields tests assert on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateContainer {
        name: String,
        image: String,
        network: String,
        dns: Vec<String>,
        auto_remove: bool,
    },
    StartContainer {
        id: String,
    },
    AttachContainer {
        id: String,
    },
    CreateExec {
        container: String,
        cmd: Vec<String>,
        user: Option<String>,
        tty: bool,
    },
    StartExec {
        id: String,
    },
    ContainerRunning {
        id: String,
    },
    ExecRunning {
        id: String,
    },
}

/// Scriptable in-memory runtime. Inspect calls report the process running
/// for a configured number of polls and stopped after that.
pub struct MockRuntime {
    calls: Mutex<Vec<MockCall>>,
    running_polls: AtomicU32,
    inspect_count: AtomicU32,
    inspect_error_after: AtomicU32,
    create_error: Mutex<Option<String>>,
    unavailable: AtomicBool,
    exec_target_missing: AtomicBool,
    start_container_error: AtomicBool,
}

impl MockRuntime {
    pub fn new() -> Arc<Self> {
        Self::with_running_polls(0)
    }

    /// How many inspect calls report the process as still running
    pub fn with_running_polls(polls: u32) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            running_polls: AtomicU32::new(polls),
            inspect_count: AtomicU32::new(0),
            inspect_error_after: AtomicU32::new(0),
            create_error: Mutex::new(None),
            unavailable: AtomicBool::new(false),
            exec_target_missing: AtomicBool::new(false),
            start_container_error: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn inspect_count(&self) -> u32 {
        self.inspect_count.load(Ordering::SeqCst)
    }

    /// Make container creation fail with the given daemon message
    pub fn fail_create(&self, message: &str) {
        *self.create_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make exec creation fail as if the target container does not exist
    pub fn set_exec_target_missing(&self, missing: bool) {
        self.exec_target_missing.store(missing, Ordering::SeqCst);
    }

    pub fn set_start_container_error(&self, fail: bool) {
        self.start_container_error.store(fail, Ordering::SeqCst);
    }

    /// Make the nth and later inspect calls fail
    pub fn set_inspect_error_after(&self, nth: u32) {
        self.inspect_error_after.store(nth, Ordering::SeqCst);
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RuntimeError::Unavailable(
                "Cannot connect to the Docker daemon".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn poll_running(&self) -> Result<bool> {
        let count = self.inspect_count.fetch_add(1, Ordering::SeqCst) + 1;
        let error_after = self.inspect_error_after.load(Ordering::SeqCst);
        if error_after > 0 && count >= error_after {
            return Err(RuntimeError::InspectFailed(
                "no such container".to_string(),
            ));
        }
        let remaining = self.running_polls.load(Ordering::SeqCst);
        if remaining > 0 {
            self.running_polls.store(remaining - 1, Ordering::SeqCst);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn attached() -> AttachedStream {
    AttachedStream {
        input: Box::pin(tokio::io::sink()),
        output: Box::pin(tokio::io::empty()),
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn create_container(&self, config: &ContainerConfig) -> Result<ContainerId> {
        self.record(MockCall::CreateContainer {
            name: config.name.clone(),
            image: config.image.clone(),
            network: config.network.clone(),
            dns: config.dns.clone(),
            auto_remove: config.auto_remove,
        });
        self.check_available()?;
        if let Some(message) = self.create_error.lock().unwrap().clone() {
            return Err(RuntimeError::CreateFailed(message));
        }
        Ok(ContainerId::new(config.name.clone()))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<()> {
        self.record(MockCall::StartContainer { id: id.to_string() });
        if self.start_container_error.load(Ordering::SeqCst) {
            return Err(RuntimeError::Api("mock start failure".to_string()));
        }
        Ok(())
    }

    async fn attach_container(&self, id: &ContainerId) -> Result<AttachedStream> {
        self.record(MockCall::AttachContainer { id: id.to_string() });
        Ok(attached())
    }

    async fn container_running(&self, id: &ContainerId) -> Result<bool> {
        self.record(MockCall::ContainerRunning { id: id.to_string() });
        self.poll_running()
    }

    async fn create_exec(&self, container: &str, config: &ExecConfig) -> Result<ExecId> {
        self.record(MockCall::CreateExec {
            container: container.to_string(),
            cmd: config.cmd.clone(),
            user: config.user.clone(),
            tty: config.tty,
        });
        self.check_available()?;
        if self.exec_target_missing.load(Ordering::SeqCst) {
            return Err(RuntimeError::NotFound(container.to_string()));
        }
        Ok(ExecId::new("mock-exec"))
    }

    async fn start_exec(&self, id: &ExecId) -> Result<AttachedStream> {
        self.record(MockCall::StartExec { id: id.to_string() });
        Ok(attached())
    }

    async fn exec_running(&self, id: &ExecId) -> Result<bool> {
        self.record(MockCall::ExecRunning { id: id.to_string() });
        self.poll_running()
    }
}

struct NoopTerm;

impl RawTerm for NoopTerm {
    fn enable(&mut self) {}
    fn disable(&mut self) {}
}

/// Guard that never touches the real terminal
pub fn noop_guard() -> RawModeGuard {
    RawModeGuard::with_term(Box::new(NoopTerm))
}
