//! Environment context: where the development environment lives on disk,
//! its stable compose project name, and its `.env` variable store.

use crate::{CoreError, Result};
use directories::UserDirs;
use mwdd_config::DotFile;
use std::path::{Path, PathBuf};

/// docker-compose project name for the default environment.
/// Container names, volume names and the session network derive from it.
pub const PROJECT_NAME: &str = "mwcli-mwdd-default";

/// A mwdd development environment rooted at a project directory
#[derive(Debug, Clone)]
pub struct Environment {
    directory: PathBuf,
}

impl Environment {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The default environment for the invoking user (`~/.mwcli/mwdd/default`)
    pub fn default_for_user() -> Result<Self> {
        let dirs = UserDirs::new().ok_or(CoreError::NoHomeDir)?;
        Ok(Self::new(
            dirs.home_dir().join(".mwcli").join("mwdd").join("default"),
        ))
    }

    /// The directory containing the development environment
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn project_name(&self) -> &'static str {
        PROJECT_NAME
    }

    /// The `.env` store for this environment
    pub fn dot_file(&self) -> DotFile {
        DotFile::for_directory(&self.directory)
    }

    /// Create the project directory and seed required `.env` defaults
    pub fn ensure_ready(&self) -> Result<()> {
        std::fs::create_dir_all(&self.directory)?;
        self.ensure_env_defaults()?;
        Ok(())
    }

    fn ensure_env_defaults(&self) -> Result<()> {
        let env = self.dot_file();

        let needed_defaults = [
            ("MEDIAWIKI_VOLUMES_CODE", "~/dev/git/gerrit/mediawiki"),
            ("PORT", "8080"),
        ];
        for (key, value) in needed_defaults {
            if env.get(key).is_none() {
                env.set(key, value)?;
            }
        }

        // UID and GID are always seeded so compose services run as the host user
        let (uid, gid) = os_user_ids();
        if env.get("UID").is_none() {
            env.set("UID", &uid)?;
        }
        if env.get("GID").is_none() {
            env.set("GID", &gid)?;
        }

        Ok(())
    }

    /// Ordered compose files active for this environment (sorted `.yml` files)
    pub fn compose_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.directory)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("yml") {
                files.push(path);
            }
        }
        files.sort();
        if files.is_empty() {
            tracing::warn!(
                "No docker-compose files found in {:?}; compose commands will fail",
                self.directory
            );
        }
        Ok(files)
    }

    /// The MediaWiki code checkout mounted into the environment, with `~`
    /// expanded, if configured
    pub fn mediawiki_code_dir(&self) -> Option<String> {
        self.dot_file()
            .get("MEDIAWIKI_VOLUMES_CODE")
            .map(|v| shellexpand::tilde(&v).into_owned())
    }
}

/// User and group id pair usable for container execution.
///
/// Windows has no POSIX ids; the 2000:2000 placeholder user won't exist in
/// the container, which doesn't matter there.
pub fn user_and_group() -> String {
    let (uid, gid) = os_user_ids();
    format!("{}:{}", uid, gid)
}

#[cfg(unix)]
fn os_user_ids() -> (String, String) {
    (
        nix::unistd::getuid().to_string(),
        nix::unistd::getgid().to_string(),
    )
}

#[cfg(not(unix))]
fn os_user_ids() -> (String, String) {
    ("2000".to_string(), "2000".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_ready_seeds_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Environment::new(tmp.path().join("default"));
        env.ensure_ready().unwrap();

        let vars = env.dot_file();
        assert_eq!(vars.get("PORT"), Some("8080".to_string()));
        assert_eq!(
            vars.get("MEDIAWIKI_VOLUMES_CODE"),
            Some("~/dev/git/gerrit/mediawiki".to_string())
        );
        assert!(vars.get("UID").is_some());
        assert!(vars.get("GID").is_some());
    }

    #[test]
    fn test_ensure_ready_keeps_existing_values() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Environment::new(tmp.path().join("default"));
        env.ensure_ready().unwrap();
        env.dot_file().set("PORT", "9999").unwrap();
        env.ensure_ready().unwrap();
        assert_eq!(env.dot_file().get("PORT"), Some("9999".to_string()));
    }

    #[test]
    fn test_compose_files_sorted_yml_only() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("zz-extra.yml"), "").unwrap();
        std::fs::write(tmp.path().join("base.yml"), "").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "").unwrap();

        let env = Environment::new(tmp.path());
        let files = env.compose_files().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["base.yml", "zz-extra.yml"]);
    }

    #[test]
    fn test_user_and_group_format() {
        let ug = user_and_group();
        let (uid, gid) = ug.split_once(':').expect("uid:gid");
        assert!(uid.chars().all(|c| c.is_ascii_digit()));
        assert!(gid.chars().all(|c| c.is_ascii_digit()));
    }
}
