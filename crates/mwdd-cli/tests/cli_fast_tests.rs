//! Fast CLI tests using assert_cmd.
//! These test the binary directly without needing a container runtime.

#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but works fine

use assert_cmd::Command;
use predicates::prelude::*;

/// Point HOME at a tempdir so tests never touch the real ~/.mwcli
fn mwdd_in(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("mwdd").unwrap();
    cmd.env("HOME", home);
    cmd.env("USERPROFILE", home);
    cmd
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("mwdd")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("MediaWiki-Docker-Dev"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("mwdd")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}

#[test]
fn test_subcommand_help() {
    for subcmd in &["create", "destroy", "suspend", "resume", "mediawiki", "env", "config"] {
        Command::cargo_bin("mwdd")
            .unwrap()
            .args([subcmd, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }
}

#[test]
fn test_unknown_subcommand_fails() {
    Command::cargo_bin("mwdd")
        .unwrap()
        .arg("nonexistent-subcommand")
        .assert()
        .failure();
}

#[test]
fn test_where_prints_environment_directory() {
    let home = tempfile::tempdir().unwrap();
    mwdd_in(home.path())
        .arg("where")
        .assert()
        .success()
        .stdout(predicate::str::contains(".mwcli"));
}

#[test]
fn test_env_set_get_roundtrip() {
    let home = tempfile::tempdir().unwrap();

    mwdd_in(home.path())
        .args(["env", "set", "PORT", "9090"])
        .assert()
        .success();

    mwdd_in(home.path())
        .args(["env", "get", "PORT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9090"));
}

#[test]
fn test_env_list_shows_seeded_defaults() {
    let home = tempfile::tempdir().unwrap();
    mwdd_in(home.path())
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MEDIAWIKI_VOLUMES_CODE="))
        .stdout(predicate::str::contains("PORT=8080"));
}

#[test]
fn test_env_delete_removes_variable() {
    let home = tempfile::tempdir().unwrap();

    mwdd_in(home.path())
        .args(["env", "set", "EXTRA", "1"])
        .assert()
        .success();
    mwdd_in(home.path())
        .args(["env", "delete", "EXTRA"])
        .assert()
        .success();
    mwdd_in(home.path())
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EXTRA").not());
}

#[test]
fn test_env_where_names_dot_file() {
    let home = tempfile::tempdir().unwrap();
    mwdd_in(home.path())
        .args(["env", "where"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".env"));
}

#[test]
fn test_config_show_renders_defaults() {
    let home = tempfile::tempdir().unwrap();
    mwdd_in(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dev_mode"));
}

#[test]
fn test_mediawiki_exec_requires_a_command() {
    let home = tempfile::tempdir().unwrap();
    mwdd_in(home.path())
        .args(["mediawiki", "exec"])
        .assert()
        .failure();
}
