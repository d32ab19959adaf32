use super::RemoteProcess;
use mwdd_runtime::ContainerRuntime;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Watches the remote process by polling inspect until it is no longer
/// running. An inspect failure also ends the wait: with auto-remove the
/// container disappears the moment its process exits, so "not found" is
/// the usual way a finished session looks.
pub struct LifecyclePoller<'a> {
    runtime: &'a dyn ContainerRuntime,
    interval: Duration,
}

impl<'a> LifecyclePoller<'a> {
    pub fn new(runtime: &'a dyn ContainerRuntime, interval: Duration) -> Self {
        Self { runtime, interval }
    }

    pub async fn wait_for_exit(&self, process: &RemoteProcess) {
        loop {
            let running = match process {
                RemoteProcess::Container(id) => self.runtime.container_running(id).await,
                RemoteProcess::Exec(id) => self.runtime.exec_running(id).await,
            };
            match running {
                Ok(true) => tokio::time::sleep(self.interval).await,
                Ok(false) => return,
                Err(e) => {
                    tracing::debug!("Inspect failed, treating session as ended: {}", e);
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockRuntime;
    use mwdd_runtime::ExecId;

    #[tokio::test]
    async fn test_returns_once_process_stops() {
        let mock = MockRuntime::with_running_polls(5);
        let poller = LifecyclePoller::new(&*mock, Duration::from_millis(1));
        poller
            .wait_for_exit(&RemoteProcess::Exec(ExecId::new("e1")))
            .await;
        assert_eq!(mock.inspect_count(), 6);
    }

    #[tokio::test]
    async fn test_inspect_error_ends_wait() {
        let mock = MockRuntime::with_running_polls(10);
        mock.set_inspect_error_after(1);
        let poller = LifecyclePoller::new(&*mock, Duration::from_millis(1));
        poller
            .wait_for_exit(&RemoteProcess::Exec(ExecId::new("e1")))
            .await;
        assert_eq!(mock.inspect_count(), 1);
    }
}
