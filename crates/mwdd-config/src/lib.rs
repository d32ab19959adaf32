//! On-disk persistence for mwdd
//!
//! This crate handles:
//! - The per-project `.env` variable store (`<project dir>/.env`)
//! - Global settings (`~/.mwcli/config.json`)

mod dotenv;
mod error;
mod settings;

pub use dotenv::*;
pub use error::*;
pub use settings::*;
