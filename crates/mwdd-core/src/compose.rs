//! docker-compose orchestration for the service group
//!
//! Every command runs the `docker-compose` binary with the project name,
//! project directory and all active compose files, inheriting the caller's
//! stdio. No retries: a non-zero exit is surfaced and the operator re-runs.

use crate::{CoreError, Environment, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runner for docker-compose commands against one environment
pub struct Compose<'a> {
    env: &'a Environment,
}

impl Environment {
    pub fn compose(&self) -> Compose<'_> {
        Compose { env: self }
    }
}

impl Compose<'_> {
    /// Run an arbitrary compose subcommand (`docker-compose <cmd> <args…>`)
    pub async fn run(&self, command: &str, args: &[String]) -> Result<()> {
        let files = self.env.compose_files()?;
        let full_args = compose_args(
            self.env.directory(),
            self.env.project_name(),
            &files,
            command,
            args,
        );

        tracing::debug!("Running docker-compose {}", command);
        let status = Command::new("docker-compose")
            .args(&full_args)
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(CoreError::CommandFailed {
                program: "docker-compose".to_string(),
                command: command.to_string(),
                status: status.code().unwrap_or(-1),
            })
        }
    }

    /// `docker-compose up -d <services…>`
    pub async fn up_detached(&self, services: &[&str]) -> Result<()> {
        let mut args = vec!["-d".to_string()];
        args.extend(services.iter().map(|s| s.to_string()));
        self.run("up", &args).await
    }

    /// `docker-compose down --volumes --remove-orphans`
    pub async fn down_with_volumes_and_orphans(&self) -> Result<()> {
        self.run(
            "down",
            &["--volumes".to_string(), "--remove-orphans".to_string()],
        )
        .await
    }

    /// `docker-compose stop <services…>`
    pub async fn stop(&self, services: &[&str]) -> Result<()> {
        let args: Vec<String> = services.iter().map(|s| s.to_string()).collect();
        self.run("stop", &args).await
    }

    /// `docker-compose start <services…>`
    pub async fn start(&self, services: &[&str]) -> Result<()> {
        let args: Vec<String> = services.iter().map(|s| s.to_string()).collect();
        self.run("start", &args).await
    }

    /// `docker-compose rm --stop --force -v <services…>`
    pub async fn rm(&self, services: &[&str]) -> Result<()> {
        let mut args = vec![
            "--stop".to_string(),
            "--force".to_string(),
            "-v".to_string(),
        ];
        args.extend(services.iter().map(|s| s.to_string()));
        self.run("rm", &args).await
    }

    /// `docker-compose exec -T <service> <cmd…>` for scripted execution.
    /// Interactive sessions go through the session engine instead.
    pub async fn exec_no_tty(&self, service: &str, cmd: &[String]) -> Result<()> {
        let mut args = vec!["-T".to_string(), service.to_string()];
        args.extend(cmd.iter().cloned());
        self.run("exec", &args).await
    }

    /// `docker volume rm <project>_<volume>` for each named compose volume
    pub async fn rm_volumes(&self, volumes: &[&str]) -> Result<()> {
        let mut args = vec!["volume".to_string(), "rm".to_string()];
        for volume in volumes {
            args.push(format!("{}_{}", self.env.project_name(), volume));
        }

        tracing::debug!("Running docker {}", args.join(" "));
        let status = Command::new("docker").args(&args).status().await?;

        if status.success() {
            Ok(())
        } else {
            Err(CoreError::CommandFailed {
                program: "docker".to_string(),
                command: "volume rm".to_string(),
                status: status.code().unwrap_or(-1),
            })
        }
    }
}

/// Build the full docker-compose argument vector: project settings, every
/// active file, then the subcommand and its arguments
fn compose_args(
    project_dir: &Path,
    project_name: &str,
    files: &[PathBuf],
    command: &str,
    args: &[String],
) -> Vec<String> {
    let mut out = vec![
        "--project-directory".to_string(),
        project_dir.to_string_lossy().to_string(),
        "-p".to_string(),
        project_name.to_string(),
    ];
    for file in files {
        out.push("-f".to_string());
        out.push(file.to_string_lossy().to_string());
    }
    out.push(command.to_string());
    out.extend(args.iter().cloned());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_args_layout() {
        let files = vec![
            PathBuf::from("/env/base.yml"),
            PathBuf::from("/env/mediawiki.yml"),
        ];
        let args = compose_args(
            Path::new("/env"),
            "mwcli-mwdd-default",
            &files,
            "up",
            &["-d".to_string(), "mediawiki".to_string()],
        );
        assert_eq!(
            args,
            vec![
                "--project-directory",
                "/env",
                "-p",
                "mwcli-mwdd-default",
                "-f",
                "/env/base.yml",
                "-f",
                "/env/mediawiki.yml",
                "up",
                "-d",
                "mediawiki",
            ]
        );
    }

    #[test]
    fn test_compose_args_no_files() {
        let args = compose_args(Path::new("/env"), "p", &[], "down", &[]);
        assert_eq!(args, vec!["--project-directory", "/env", "-p", "p", "down"]);
    }
}
