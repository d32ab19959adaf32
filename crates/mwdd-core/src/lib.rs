//! Core logic for the mwdd development environment
//!
//! This crate provides:
//! - The interactive container session engine (attach a local terminal to a
//!   process running inside a container, new or existing)
//! - The environment context (project directory, name, compose files, .env)
//! - docker-compose orchestration for the service group

mod compose;
mod environment;
mod error;
mod session;

pub use compose::*;
pub use environment::*;
pub use error::*;
pub use session::*;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
