//! MediaWiki service commands: lifecycle, interactive sessions, install

use super::run_session;
use anyhow::{bail, Result};
use dialoguer::Confirm;
use mwdd_core::{user_and_group, Environment, SessionSpec};
use std::path::PathBuf;

const SERVICE: &str = "mediawiki";
const DATA_VOLUMES: [&str; 3] = ["mediawiki-data", "mediawiki-images", "mediawiki-logs"];
const COMPOSER_IMAGE: &str = "composer:latest";

/// Path of the MediaWiki checkout inside the service container
const CODE_DIR_IN_CONTAINER: &str = "/var/www/html/w";

pub async fn mediawiki_create(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    env.compose().up_detached(&[SERVICE]).await?;
    Ok(())
}

pub async fn mediawiki_destroy(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    env.compose().rm(&[SERVICE]).await?;
    env.compose().rm_volumes(&DATA_VOLUMES).await?;
    Ok(())
}

pub async fn mediawiki_suspend(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    env.compose().stop(&[SERVICE]).await?;
    Ok(())
}

pub async fn mediawiki_resume(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    env.compose().start(&[SERVICE]).await?;
    Ok(())
}

/// Interactive session into the running MediaWiki container
pub async fn mediawiki_exec(
    env: &Environment,
    user: Option<String>,
    cmd: Vec<String>,
) -> Result<()> {
    env.ensure_ready()?;
    let spec = SessionSpec::exec_into(SERVICE)
        .command(cmd)
        .user(user.unwrap_or_else(user_and_group))
        .build()?;
    run_session(env, spec).await
}

pub async fn mediawiki_phpunit(env: &Environment, args: Vec<String>) -> Result<()> {
    env.ensure_ready()?;
    let mut cmd = vec![
        "php".to_string(),
        format!("{}/tests/phpunit/phpunit.php", CODE_DIR_IN_CONTAINER),
        "--wiki".to_string(),
        "default".to_string(),
    ];
    cmd.extend(args);
    let spec = SessionSpec::exec_into(SERVICE).command(cmd).build()?;
    run_session(env, spec).await
}

/// Run composer against the MediaWiki checkout in a throwaway container
/// that joins the environment's network
pub async fn mediawiki_composer(env: &Environment, args: Vec<String>) -> Result<()> {
    env.ensure_ready()?;
    let code_dir = require_code_dir(env)?;
    let code_dir = code_dir.to_string_lossy().into_owned();

    let mut cmd = vec!["composer".to_string()];
    cmd.extend(args);
    let spec = SessionSpec::new_container(COMPOSER_IMAGE, "composer")
        .command(cmd)
        .working_dir(code_dir.clone())
        .user(user_and_group())
        .mount_in_place(code_dir)
        .build()?;
    run_session(env, spec).await
}

/// Scripted `install.php` flow inside the MediaWiki container.
///
/// The user's LocalSettings.php is moved aside so the installer writes its
/// generated config to /tmp instead of clobbering it, and moved back after.
pub async fn mediawiki_install(env: &Environment, dbtype: &str, dbname: &str) -> Result<()> {
    env.ensure_ready()?;
    let code_dir = require_code_dir(env)?;

    let local_settings = code_dir.join("LocalSettings.php");
    if !local_settings.exists() {
        let create = Confirm::new()
            .with_prompt("No LocalSettings.php detected. Do you want to create the default mwdd file?")
            .interact()?;
        if !create {
            bail!("Can't install without the expected LocalSettings.php file");
        }
        std::fs::write(
            &local_settings,
            "<?php\n//require_once \"$IP/includes/PlatformSettings.php\";\nrequire_once '/mwdd/MwddSettings.php';",
        )?;
    }

    let contents = std::fs::read_to_string(&local_settings)?;
    if !contents.contains("/mwdd/MwddSettings.php") {
        bail!("LocalSettings.php file exists, but doesn't look right (missing mwcli mwdd shim)");
    }

    let compose = env.compose();
    let port = env
        .dot_file()
        .get("PORT")
        .unwrap_or_else(|| "8080".to_string());
    let server = format!("http://{}.mediawiki.mwdd.localhost:{}", dbname, port);

    // Move the custom LocalSettings.php aside so the installer doesn't
    // overwrite it
    compose
        .exec_no_tty(SERVICE, &strings(&["mv",
            "/var/www/html/w/LocalSettings.php",
            "/var/www/html/w/LocalSettings.php.mwdd.tmp"]))
        .await?;

    let install_result = match dbtype {
        "sqlite" => {
            compose
                .exec_no_tty(
                    SERVICE,
                    &strings(&[
                        "php", "/var/www/html/w/maintenance/install.php",
                        "--confpath", "/tmp",
                        "--server", &server,
                        "--dbtype", dbtype,
                        "--dbname", dbname,
                        "--lang", "en",
                        "--pass", "mwddpassword",
                        &format!("docker-{}", dbname),
                        "admin",
                    ]),
                )
                .await
        }
        "mysql" => {
            compose
                .exec_no_tty(SERVICE, &strings(&["/wait-for-it.sh", "mysql:3306"]))
                .await?;
            compose
                .exec_no_tty(
                    SERVICE,
                    &strings(&[
                        "php", "/var/www/html/w/maintenance/install.php",
                        "--confpath", "/tmp",
                        "--server", &server,
                        "--dbtype", dbtype,
                        "--dbuser", "root",
                        "--dbpass", "toor",
                        "--dbname", dbname,
                        "--dbserver", "mysql",
                        "--lang", "en",
                        "--pass", "mwddpassword",
                        &format!("docker-{}", dbname),
                        "admin",
                    ]),
                )
                .await
        }
        other => bail!("Unsupported database type '{}'", other),
    };

    // Always move the custom LocalSettings.php back, even if the install
    // itself failed
    compose
        .exec_no_tty(SERVICE, &strings(&["mv",
            "/var/www/html/w/LocalSettings.php.mwdd.tmp",
            "/var/www/html/w/LocalSettings.php"]))
        .await?;
    install_result?;

    compose
        .exec_no_tty(
            SERVICE,
            &strings(&["php", "/var/www/html/w/maintenance/update.php",
                "--wiki", dbname, "--quick"]),
        )
        .await?;
    Ok(())
}

fn require_code_dir(env: &Environment) -> Result<PathBuf> {
    match env.mediawiki_code_dir() {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => bail!(
            "MEDIAWIKI_VOLUMES_CODE is not set; run `mwdd env set MEDIAWIKI_VOLUMES_CODE <path>`"
        ),
    }
}

fn strings(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}
