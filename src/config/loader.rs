// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawParameters, RunParameters};
use crate::errors::{ExectesterError, Result};

/// File name looked up in the home directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".exectester.toml";

/// Load a TOML config file from a given path.
///
/// This only performs deserialization; defaults and validation happen when
/// the layers are merged into [`RunParameters`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawParameters> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        ExectesterError::ConfigError(format!("reading config file {}: {e}", path.display()))
    })?;

    let config: RawParameters = toml::from_str(&contents)?;

    Ok(config)
}

/// `$HOME/.exectester.toml`, if a home directory can be found.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE_NAME))
}

/// Load the config-file layer.
///
/// An explicit path must exist. The default path is only read if present.
pub fn load_config_layer(explicit: Option<&Path>) -> Result<RawParameters> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            debug!(path = %path.display(), "using default config file");
            load_from_path(path)
        }
        _ => Ok(RawParameters::default()),
    }
}

/// Merge the command-line/environment layer over the config-file layer and
/// validate the result.
///
/// This is the recommended entry point for the binary: the returned
/// parameters are ready for [`crate::engine::dispatch`].
pub fn resolve(cli: RawParameters, config_path: Option<&Path>) -> Result<RunParameters> {
    let file = load_config_layer(config_path)?;
    RunParameters::try_from(cli.layered_over(file))
}
