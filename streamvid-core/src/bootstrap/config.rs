//! Configuration loading

use std::path::Path;

use anyhow::{bail, Result};

use crate::Config;

/// Environment variable naming a config file
pub const CONFIG_PATH_ENV: &str = "STREAMVID_CONFIG_PATH";

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config.yaml", "/config/config.yaml"];

/// Load configuration from config file or environment variables
///
/// Config file search order:
/// 1. `explicit_path` (e.g. from the command line); must exist
/// 2. STREAMVID_CONFIG_PATH environment variable
/// 3. ./config.yaml (current working directory)
/// 4. /config/config.yaml (container mount path)
/// 5. Fall back to environment variables only
///
/// Runs before logging is initialised, so progress goes to stderr.
pub fn load_config(explicit_path: Option<&str>) -> Result<Config> {
    let env_path = std::env::var(CONFIG_PATH_ENV).ok();
    let config_path =
        resolve_config_path(explicit_path, env_path.as_deref(), &DEFAULT_CONFIG_PATHS)?;

    let config = if let Some(path) = config_path {
        eprintln!("Loading config from {path}");
        Config::from_file(&path).map_err(|e| anyhow::anyhow!("Failed to load {path}: {e}"))?
    } else {
        eprintln!("No config file found, using environment variables");
        Config::from_env().unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}");
            eprintln!("Using default configuration");
            Config::default()
        })
    };

    // Fail fast on misconfigurations
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Config validation error: {error}");
        }
        bail!(
            "Configuration validation failed with {} error(s): {}",
            errors.len(),
            errors.join("; ")
        );
    }

    Ok(config)
}

/// Pick the config file to load, if any.
///
/// A missing explicit path is an error. A missing env path is reported and
/// skipped.
fn resolve_config_path(
    explicit_path: Option<&str>,
    env_path: Option<&str>,
    defaults: &[&str],
) -> Result<Option<String>> {
    if let Some(path) = explicit_path {
        if !Path::new(path).exists() {
            bail!("config file {path} not found");
        }
        return Ok(Some(path.to_string()));
    }

    if let Some(path) = env_path {
        if Path::new(path).exists() {
            return Ok(Some(path.to_string()));
        }
        eprintln!("{CONFIG_PATH_ENV} is set to {path}, which does not exist; ignoring it");
    }

    Ok(defaults
        .iter()
        .copied()
        .find(|p| Path::new(p).exists())
        .map(str::to_string))
}
