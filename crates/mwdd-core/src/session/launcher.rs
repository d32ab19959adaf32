use super::{
    compose_network_name, custom_container_name, service_container_name, RemoteProcess,
    SessionSpec, SessionTarget,
};
use crate::{ErrorKind, SessionError};
use mwdd_runtime::{ContainerConfig, ContainerRuntime, ExecConfig, RuntimeError};

/// Resolver every session container is pointed at, so hostnames like
/// default.mediawiki.mwdd.localhost resolve to the compose services.
/// Must match the address the dns service binds in the compose files.
pub const SESSION_DNS: &str = "10.0.0.10";

/// Turns a session spec into a remote process, without attaching to it
pub(crate) struct SessionLauncher<'a> {
    runtime: &'a dyn ContainerRuntime,
    project: &'a str,
}

impl<'a> SessionLauncher<'a> {
    pub fn new(runtime: &'a dyn ContainerRuntime, project: &'a str) -> Self {
        Self { runtime, project }
    }

    pub async fn launch(&self, spec: &SessionSpec) -> Result<RemoteProcess, SessionError> {
        match &spec.target {
            SessionTarget::ExistingService { service } => self.launch_exec(spec, service).await,
            SessionTarget::NewContainer { image, suffix } => {
                self.launch_container(spec, image, suffix).await
            }
        }
    }

    async fn launch_exec(
        &self,
        spec: &SessionSpec,
        service: &str,
    ) -> Result<RemoteProcess, SessionError> {
        let container = service_container_name(self.project, service);
        let config = ExecConfig {
            cmd: spec.command.clone(),
            working_dir: spec.working_dir.clone(),
            user: spec.user.clone(),
            tty: spec.tty,
        };
        match self.runtime.create_exec(&container, &config).await {
            Ok(id) => Ok(RemoteProcess::Exec(id)),
            Err(e) if e.is_not_found() => Err(SessionError::new(
                ErrorKind::ServiceNotRunning,
                format!(
                    "{} is not running; bring the environment up first",
                    service
                ),
            )),
            Err(e) => Err(map_launch_error(e)),
        }
    }

    async fn launch_container(
        &self,
        spec: &SessionSpec,
        image: &str,
        suffix: &str,
    ) -> Result<RemoteProcess, SessionError> {
        let config = ContainerConfig {
            image: image.to_string(),
            name: custom_container_name(self.project, suffix),
            entrypoint: spec.command.clone(),
            working_dir: spec.working_dir.clone(),
            user: spec.user.clone(),
            mounts: spec.mounts.clone(),
            network: compose_network_name(self.project),
            dns: vec![SESSION_DNS.to_string()],
            auto_remove: true,
            tty: spec.tty,
        };
        self.runtime
            .create_container(&config)
            .await
            .map(RemoteProcess::Container)
            .map_err(map_launch_error)
    }
}

fn map_launch_error(e: RuntimeError) -> SessionError {
    match e {
        RuntimeError::Unavailable(_) => {
            SessionError::new(ErrorKind::RuntimeUnavailable, e.to_string())
        }
        other => SessionError::new(ErrorKind::CreateFailed, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockCall, MockRuntime};

    #[tokio::test]
    async fn test_exec_launch_targets_first_replica() {
        let mock = MockRuntime::new();
        let launcher = SessionLauncher::new(&*mock, "mwcli-mwdd-default");
        let spec = SessionSpec::exec_into("mediawiki")
            .command(["bash"])
            .build()
            .unwrap();

        let process = launcher.launch(&spec).await.unwrap();
        assert!(matches!(process, RemoteProcess::Exec(_)));
        assert!(mock.calls().iter().any(|c| matches!(
            c,
            MockCall::CreateExec { container, .. } if container == "mwcli-mwdd-default_mediawiki_1"
        )));
    }

    #[tokio::test]
    async fn test_container_launch_joins_compose_network_with_dns() {
        let mock = MockRuntime::new();
        let launcher = SessionLauncher::new(&*mock, "mwcli-mwdd-default");
        let spec = SessionSpec::new_container("composer:latest", "composer")
            .command(["composer", "info"])
            .build()
            .unwrap();

        launcher.launch(&spec).await.unwrap();

        let calls = mock.calls();
        let create = calls
            .iter()
            .find_map(|c| match c {
                MockCall::CreateContainer {
                    name,
                    network,
                    dns,
                    auto_remove,
                    ..
                } => Some((name.clone(), network.clone(), dns.clone(), *auto_remove)),
                _ => None,
            })
            .expect("create issued");
        assert_eq!(create.0, "mwcli-mwdd-default-custom_composer");
        assert_eq!(create.1, "mwcli-mwdd-default_dps");
        assert_eq!(create.2, vec![SESSION_DNS.to_string()]);
        assert!(create.3, "session containers are auto-removed");
    }

    #[tokio::test]
    async fn test_runtime_unavailable_is_not_reported_as_create_failure() {
        let mock = MockRuntime::new();
        mock.set_unavailable(true);
        let launcher = SessionLauncher::new(&*mock, "default");
        let spec = SessionSpec::exec_into("mediawiki")
            .command(["bash"])
            .build()
            .unwrap();

        let err = launcher.launch(&spec).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RuntimeUnavailable);
    }
}
