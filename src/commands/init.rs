use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::config::{default_config_toml, CONFIG_FILE};

/// Write the default `smelter.toml` into the working directory
pub fn init_config(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() && !force {
        bail!("{CONFIG_FILE} already exists (use --force to overwrite)");
    }
    fs::write(path, default_config_toml())?;
    println!("Created {CONFIG_FILE}");
    Ok(())
}
