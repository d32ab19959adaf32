//! CLI command implementations

mod env_store;
mod environment;
mod mediawiki;
mod settings;

pub use env_store::*;
pub use environment::*;
pub use mediawiki::*;
pub use settings::*;

use anyhow::Result;
use mwdd_core::{Environment, SessionRunner, SessionSpec};
use mwdd_runtime::DockerRuntime;
use std::sync::Arc;

/// Run a session spec against the default environment and propagate a
/// session failure as a fatal CLI error
async fn run_session(env: &Environment, spec: SessionSpec) -> Result<()> {
    tracing::debug!("Running session in project {}: {:?}", env.project_name(), spec.target);
    let runtime = DockerRuntime::connect().await?;
    let runner = SessionRunner::new(Arc::new(runtime), env.project_name());
    runner.run_interactive_session(&spec).await.into_result()?;
    Ok(())
}
