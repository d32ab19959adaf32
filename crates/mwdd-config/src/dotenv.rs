//! Per-project `.env` variable store
//!
//! The development environment keeps its tunable values (ports, volume
//! source paths, uid/gid) in a plain `KEY=VALUE` file that docker-compose
//! also reads. Keys are kept in sorted order so rewrites are stable.

use crate::{ConfigError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Handle to the `.env` file inside a project directory
#[derive(Debug, Clone)]
pub struct DotFile {
    path: PathBuf,
}

impl DotFile {
    /// The `.env` store for a project directory
    pub fn for_directory(dir: &Path) -> Self {
        Self {
            path: dir.join(".env"),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a single value, `None` when unset or the file does not exist
    pub fn get(&self, key: &str) -> Option<String> {
        self.read().ok().and_then(|vars| vars.get(key).cloned())
    }

    /// Set a single value, creating the file if needed
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut vars = self.read().unwrap_or_default();
        vars.insert(key.to_string(), value.to_string());
        self.write(&vars)
    }

    /// Remove a single key; unset keys are not an error
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut vars = self.read().unwrap_or_default();
        vars.remove(key);
        self.write(&vars)
    }

    /// Remove every key
    pub fn clear(&self) -> Result<()> {
        self.write(&BTreeMap::new())
    }

    /// All values, sorted by key
    pub fn all(&self) -> BTreeMap<String, String> {
        self.read().unwrap_or_default()
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| ConfigError::ReadError {
                path: self.path.clone(),
                source,
            })?;

        let mut vars = BTreeMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                vars.insert(key.trim().to_string(), value.to_string());
            } else {
                tracing::debug!("Skipping malformed line in {:?}: {}", self.path, line);
            }
        }
        Ok(vars)
    }

    fn write(&self, vars: &BTreeMap<String, String>) -> Result<()> {
        let mut content = String::new();
        for (key, value) in vars {
            content.push_str(key);
            content.push('=');
            content.push_str(value);
            content.push('\n');
        }
        std::fs::write(&self.path, content).map_err(|source| ConfigError::WriteError {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let env = DotFile::for_directory(tmp.path());
        assert_eq!(env.get("PORT"), None);
        assert!(env.all().is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let tmp = tempfile::tempdir().unwrap();
        let env = DotFile::for_directory(tmp.path());
        env.set("PORT", "8080").unwrap();
        env.set("UID", "1000").unwrap();
        assert_eq!(env.get("PORT"), Some("8080".to_string()));
        assert_eq!(env.get("UID"), Some("1000".to_string()));
    }

    #[test]
    fn test_set_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let env = DotFile::for_directory(tmp.path());
        env.set("PORT", "8080").unwrap();
        env.set("PORT", "9090").unwrap();
        assert_eq!(env.get("PORT"), Some("9090".to_string()));
        assert_eq!(env.all().len(), 1);
    }

    #[test]
    fn test_delete_and_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let env = DotFile::for_directory(tmp.path());
        env.set("A", "1").unwrap();
        env.set("B", "2").unwrap();
        env.delete("A").unwrap();
        assert_eq!(env.get("A"), None);
        assert_eq!(env.get("B"), Some("2".to_string()));
        env.clear().unwrap();
        assert!(env.all().is_empty());
    }

    #[test]
    fn test_delete_unset_key_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let env = DotFile::for_directory(tmp.path());
        env.delete("NOPE").unwrap();
    }

    #[test]
    fn test_file_is_sorted_and_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        let env = DotFile::for_directory(tmp.path());
        env.set("ZZZ", "last").unwrap();
        env.set("AAA", "first").unwrap();
        let content = std::fs::read_to_string(env.path()).unwrap();
        assert_eq!(content, "AAA=first\nZZZ=last\n");
    }

    #[test]
    fn test_value_with_equals_sign() {
        let tmp = tempfile::tempdir().unwrap();
        let env = DotFile::for_directory(tmp.path());
        env.set("FLAGS", "a=b=c").unwrap();
        assert_eq!(env.get("FLAGS"), Some("a=b=c".to_string()));
    }
}
