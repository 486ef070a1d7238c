use std::path::{Path, PathBuf};

use tracing::warn;
use traj_control::TrajControlConfig;

use crate::Error;

const TRAJ_CONTROL_CONFIG_ENV_NAME: &str = "TRAJ_CONTROL_CONFIG_PATH";

/// Get config path from input or env TRAJ_CONTROL_CONFIG_PATH
pub fn get_apps_config_path(config: Option<PathBuf>) -> Option<PathBuf> {
    if config.is_some() {
        config
    } else {
        std::env::var(TRAJ_CONTROL_CONFIG_ENV_NAME)
            .map(|s| {
                warn!("### ENV VAR {} is used ###", s);
                PathBuf::from(s)
            })
            .ok()
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrajControlConfig, Error> {
    let s = std::fs::read_to_string(&path)
        .map_err(|e| Error::NoFile(path.as_ref().to_owned(), e))?;
    config_from_str(&s, path)
}

/// Parses and validates a config.
pub fn config_from_str<P: AsRef<Path>>(s: &str, path: P) -> Result<TrajControlConfig, Error> {
    let config: TrajControlConfig =
        toml::from_str(s).map_err(|e| Error::TomlParseFailure(path.as_ref().to_owned(), e))?;
    config.validate()?;
    Ok(config)
}

/// Loads the config at `path`, or the built-in defaults if there is none.
pub fn load_config_or_default(path: Option<PathBuf>) -> Result<TrajControlConfig, Error> {
    match get_apps_config_path(path) {
        Some(path) => load_config(path),
        None => Ok(TrajControlConfig::default()),
    }
}
