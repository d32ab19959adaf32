//! Global configuration commands

use anyhow::Result;
use mwdd_config::Settings;

pub fn config_show() -> Result<()> {
    let settings = Settings::load_from_disk()?;
    println!("{}", settings.pretty_print()?);
    Ok(())
}
