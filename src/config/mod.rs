mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const BACKEND_URL_ENV: &str = "BACKEND_BASE_URL";

pub async fn load() -> Result<Config> {
    let explicit_path = env::var("CONFIG_PATH").ok();
    let mut config = match explicit_path {
        Some(path) => load_from(&path).await?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from(DEFAULT_CONFIG_PATH).await?,
        None => {
            debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    apply_backend_override(&mut config, env::var(BACKEND_URL_ENV).ok());

    Ok(config)
}

pub async fn load_from(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(config_str)?;
    if config.server.max_body_bytes == 0 {
        return Err(Error::config("server.max_body_bytes must be greater than zero"));
    }
    Ok(config)
}

/// Environment wins over the file when the variable is set.
pub fn apply_backend_override(config: &mut Config, base_url: Option<String>) {
    if let Some(base_url) = base_url {
        debug!("Backend base URL overridden from {}", BACKEND_URL_ENV);
        config.backend.base_url = base_url;
    }
}
