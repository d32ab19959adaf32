//! Whole-environment commands: where, create, destroy, suspend, resume,
//! docker-compose passthrough

use anyhow::{bail, Result};
use mwdd_core::Environment;

pub fn where_cmd(env: &Environment) {
    println!("{}", env.directory().display());
}

pub async fn create(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    env.compose().up_detached(&["mediawiki"]).await?;
    Ok(())
}

pub async fn destroy(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    env.compose().down_with_volumes_and_orphans().await?;
    Ok(())
}

pub async fn suspend(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    env.compose().stop(&[]).await?;
    Ok(())
}

pub async fn resume(env: &Environment) -> Result<()> {
    env.ensure_ready()?;
    env.compose().start(&[]).await?;
    Ok(())
}

/// Pass a raw docker-compose command through with the environment's
/// project settings and compose files applied
pub async fn docker_compose(env: &Environment, args: Vec<String>) -> Result<()> {
    env.ensure_ready()?;
    let Some((command, rest)) = args.split_first() else {
        bail!("No docker-compose command given (try `mwdd docker-compose ps`)");
    };
    env.compose().run(command, rest).await?;
    Ok(())
}
