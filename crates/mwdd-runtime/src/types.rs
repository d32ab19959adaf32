//! Common types for the runtime client

/// Container identifier or deterministic container name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Runtime-assigned exec context identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecId(pub String);

impl ExecId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ExecId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-place bind mount (source path == target path)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    pub source: String,
    pub target: String,
}

impl BindMount {
    /// Mount a host path at the same path inside the container
    pub fn in_place(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            source: path.clone(),
            target: path,
        }
    }
}

/// Configuration for creating a session container
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    /// Image to run
    pub image: String,
    /// Container name
    pub name: String,
    /// Command, installed as the entrypoint
    pub entrypoint: Vec<String>,
    /// Working directory
    pub working_dir: Option<String>,
    /// User to run as ("uid:gid" or username)
    pub user: Option<String>,
    /// Bind mounts
    pub mounts: Vec<BindMount>,
    /// Network the container joins
    pub network: String,
    /// DNS resolvers
    pub dns: Vec<String>,
    /// Remove the container filesystem when the process exits
    pub auto_remove: bool,
    /// Allocate a TTY and attach all three standard streams
    pub tty: bool,
}

/// Configuration for creating an exec context
#[derive(Debug, Clone, Default)]
pub struct ExecConfig {
    /// Command to execute
    pub cmd: Vec<String>,
    /// Working directory
    pub working_dir: Option<String>,
    /// User to run as
    pub user: Option<String>,
    /// Allocate a TTY and attach all three standard streams
    pub tty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_place_mount() {
        let mount = BindMount::in_place("/home/dev/git/mediawiki");
        assert_eq!(mount.source, mount.target);
        assert_eq!(mount.source, "/home/dev/git/mediawiki");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ContainerId::new("abc").to_string(), "abc");
        assert_eq!(ExecId::new("def").to_string(), "def");
    }
}
