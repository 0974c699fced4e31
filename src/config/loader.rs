use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment, Map};
use log::{info, trace};

use super::AppConfig;

pub const ENV_PREFIX: &str = "KRYPTOKRONA";

pub fn get_default_config() -> &'static str {
    include_str!("../../config/config.toml")
}

/// Loads the configuration file at `path`, creating it from the embedded
/// defaults when it does not exist yet. Environment variables prefixed with
/// `KRYPTOKRONA_` override file values, with `__` separating nested keys
/// (`KRYPTOKRONA_NODE__HOST`).
pub fn load_configuration(path: &Path) -> Result<Config> {
    build_configuration(path, None)
}

/// Builds the configuration, reading overrides from `env` instead of the
/// process environment when it is given.
fn build_configuration(path: &Path, env: Option<Map<String, String>>) -> Result<Config> {
    if !path.exists() {
        let sources = get_default_config();
        write_config_to(path, sources).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    let cfg = Config::builder()
        .add_source(config::File::with_name(filename))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env),
        )
        .build()
        .context("Could not build config")?;

    trace!(path:% = path.display(); "Configuration loaded");
    Ok(cfg)
}

pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    load_configuration(path)?
        .try_deserialize()
        .context("Invalid configuration values")
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    file.write_all(b"\n").context("Failed to write newline")?;
    Ok(())
}
