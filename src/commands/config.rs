//! Configuration display and initialization.

use bandscope::config::{default_config_path, BandscopeConfig};

/// Prints the effective configuration as TOML, or writes it to the default path.
///
/// # Errors
/// - If the configuration cannot be serialized
/// - If `write` is set and the config file cannot be written
pub fn handle_config(config: &BandscopeConfig, write: bool) -> anyhow::Result<()> {
    if write {
        let path = default_config_path()?;
        if path.exists() {
            tracing::info!("Overwriting existing config file: {}", path.display());
        }
        config.save_to(&path)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
