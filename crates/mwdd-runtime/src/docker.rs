//! Docker runtime implementation using bollard

use crate::{
    AttachedStream, ContainerConfig, ContainerId, ContainerRuntime, ExecConfig, ExecId,
    RuntimeError, Result,
};
use async_trait::async_trait;
use bollard::container::{
    AttachContainerOptions, Config, CreateContainerOptions, InspectContainerOptions,
    NetworkingConfig, StartContainerOptions,
};
use bollard::exec::{CreateExecOptions, StartExecOptions, StartExecResults};
use bollard::service::{EndpointSettings, HostConfig, Mount, MountTypeEnum};
use bollard::Docker;
use std::collections::HashMap;
use std::pin::Pin;
use tokio::io::AsyncRead;

/// Docker runtime client using the bollard crate
pub struct DockerRuntime {
    client: Docker,
}

impl DockerRuntime {
    /// Connect to the local Docker daemon and verify it responds
    pub async fn connect() -> Result<Self> {
        let client = Docker::connect_with_local_defaults()
            .map_err(|e| RuntimeError::Unavailable(e.to_string()))?;

        client
            .ping()
            .await
            .map_err(|e| RuntimeError::Unavailable(e.to_string()))?;

        Ok(Self { client })
    }
}

/// True when the daemon reported a 404 for the addressed object
fn is_missing(err: &bollard::errors::Error) -> bool {
    matches!(
        err,
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn create_container(&self, config: &ContainerConfig) -> Result<ContainerId> {
        let options = CreateContainerOptions {
            name: config.name.as_str(),
            platform: None,
        };

        let mounts: Vec<Mount> = config
            .mounts
            .iter()
            .map(|m| Mount {
                typ: Some(MountTypeEnum::BIND),
                source: Some(m.source.clone()),
                target: Some(m.target.clone()),
                ..Default::default()
            })
            .collect();

        let host_config = HostConfig {
            mounts: if mounts.is_empty() {
                None
            } else {
                Some(mounts)
            },
            auto_remove: Some(config.auto_remove),
            dns: if config.dns.is_empty() {
                None
            } else {
                Some(config.dns.clone())
            },
            ..Default::default()
        };

        let networking_config = NetworkingConfig {
            endpoints_config: HashMap::from([(
                config.network.clone(),
                EndpointSettings::default(),
            )]),
        };

        let container_config = Config {
            image: Some(config.image.clone()),
            entrypoint: Some(config.entrypoint.clone()),
            working_dir: config.working_dir.clone(),
            user: config.user.clone(),
            tty: Some(config.tty),
            open_stdin: Some(true),
            attach_stdin: Some(true),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            host_config: Some(host_config),
            networking_config: Some(networking_config),
            ..Default::default()
        };

        tracing::debug!("Creating container {} from {}", config.name, config.image);
        let response = self
            .client
            .create_container(Some(options), container_config)
            .await
            .map_err(|e| RuntimeError::CreateFailed(e.to_string()))?;

        Ok(ContainerId::new(response.id))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<()> {
        tracing::debug!("Starting container {}", id);
        self.client
            .start_container(&id.0, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| {
                if is_missing(&e) {
                    RuntimeError::NotFound(id.0.clone())
                } else {
                    RuntimeError::Api(e.to_string())
                }
            })?;
        Ok(())
    }

    async fn attach_container(&self, id: &ContainerId) -> Result<AttachedStream> {
        let options = AttachContainerOptions::<String> {
            stdin: Some(true),
            stdout: Some(true),
            stderr: Some(true),
            stream: Some(true),
            ..Default::default()
        };

        tracing::debug!("Attaching to container {}", id);
        let results = self
            .client
            .attach_container(&id.0, Some(options))
            .await
            .map_err(|e| RuntimeError::AttachFailed(e.to_string()))?;

        Ok(AttachedStream {
            input: results.input,
            output: Box::pin(LogOutputReader::new(results.output)),
        })
    }

    async fn container_running(&self, id: &ContainerId) -> Result<bool> {
        let response = self
            .client
            .inspect_container(&id.0, None::<InspectContainerOptions>)
            .await
            .map_err(|e| RuntimeError::InspectFailed(e.to_string()))?;

        Ok(response
            .state
            .and_then(|s| s.running)
            .unwrap_or(false))
    }

    async fn create_exec(&self, container: &str, config: &ExecConfig) -> Result<ExecId> {
        let options = CreateExecOptions {
            cmd: Some(config.cmd.clone()),
            working_dir: config.working_dir.clone(),
            user: config.user.clone(),
            tty: Some(config.tty),
            attach_stdin: Some(true),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            ..Default::default()
        };

        tracing::debug!("Creating exec in {}: {:?}", container, config.cmd);
        let response = self
            .client
            .create_exec(container, options)
            .await
            .map_err(|e| {
                if is_missing(&e) {
                    RuntimeError::NotFound(container.to_string())
                } else {
                    RuntimeError::Api(e.to_string())
                }
            })?;

        Ok(ExecId::new(response.id))
    }

    async fn start_exec(&self, id: &ExecId) -> Result<AttachedStream> {
        let options = StartExecOptions {
            detach: false,
            tty: true,
            ..Default::default()
        };

        let results = self
            .client
            .start_exec(&id.0, Some(options))
            .await
            .map_err(|e| RuntimeError::AttachFailed(e.to_string()))?;

        match results {
            StartExecResults::Attached { output, input } => Ok(AttachedStream {
                input,
                output: Box::pin(LogOutputReader::new(output)),
            }),
            StartExecResults::Detached => Err(RuntimeError::AttachFailed(
                "exec started in detached mode".to_string(),
            )),
        }
    }

    async fn exec_running(&self, id: &ExecId) -> Result<bool> {
        let response = self
            .client
            .inspect_exec(&id.0)
            .await
            .map_err(|e| RuntimeError::InspectFailed(e.to_string()))?;

        Ok(response.running.unwrap_or(false))
    }
}

/// Adapts bollard's TTY-framed log output stream to AsyncRead
struct LogOutputReader<S> {
    stream: S,
    buffer: Vec<u8>,
    pos: usize,
}

impl<S> LogOutputReader<S> {
    fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            pos: 0,
        }
    }
}

impl<S> AsyncRead for LogOutputReader<S>
where
    S: futures::Stream<
            Item = std::result::Result<bollard::container::LogOutput, bollard::errors::Error>,
        > + Unpin,
{
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        use futures::Stream;

        // Drain buffered data before polling for more
        if self.pos < self.buffer.len() {
            let remaining = &self.buffer[self.pos..];
            let to_copy = std::cmp::min(remaining.len(), buf.remaining());
            buf.put_slice(&remaining[..to_copy]);
            self.pos += to_copy;
            return std::task::Poll::Ready(Ok(()));
        }

        self.buffer.clear();
        self.pos = 0;

        loop {
            match Pin::new(&mut self.stream).poll_next(cx) {
                std::task::Poll::Ready(Some(Ok(output))) => {
                    // Under TTY framing everything arrives on one channel.
                    // Empty frames must not be mistaken for EOF.
                    self.buffer = output.into_bytes().to_vec();
                    if self.buffer.is_empty() {
                        continue;
                    }
                    let to_copy = std::cmp::min(self.buffer.len(), buf.remaining());
                    buf.put_slice(&self.buffer[..to_copy]);
                    self.pos = to_copy;
                    return std::task::Poll::Ready(Ok(()));
                }
                std::task::Poll::Ready(Some(Err(e))) => {
                    return std::task::Poll::Ready(Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        e.to_string(),
                    )))
                }
                std::task::Poll::Ready(None) => return std::task::Poll::Ready(Ok(())),
                std::task::Poll::Pending => return std::task::Poll::Pending,
            }
        }
    }
}
