//! Commands for the environment's .env variable store

use anyhow::Result;
use mwdd_core::Environment;

pub fn env_where(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    println!("{}", env.dot_file().path().display());
    Ok(())
}

pub fn env_list(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    for (key, value) in env.dot_file().all() {
        println!("{}={}", key, value);
    }
    Ok(())
}

pub fn env_get(env: &Environment, name: &str) -> Result<()> {
    env.ensure_ready()?;
    if let Some(value) = env.dot_file().get(name) {
        println!("{}", value);
    }
    Ok(())
}

pub fn env_set(env: &Environment, name: &str, value: &str) -> Result<()> {
    env.ensure_ready()?;
    env.dot_file().set(name, value)?;
    Ok(())
}

pub fn env_delete(env: &Environment, name: &str) -> Result<()> {
    env.ensure_ready()?;
    env.dot_file().delete(name)?;
    Ok(())
}

pub fn env_clear(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    env.dot_file().clear()?;
    Ok(())
}
