use crate::config::DefaultsConfig;
use crate::error::{CliError, Result};

pub fn run() -> Result<()> {
    let rendered = DefaultsConfig::default()
        .to_toml()
        .map_err(|e| CliError::Other(e.into()))?;
    print!("{}", rendered);
    Ok(())
}
