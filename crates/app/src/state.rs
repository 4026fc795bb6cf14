//! Startup configuration lookup

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use haxroom_core::{AppConfig, Result};

pub const CONFIG_FILE: &str = "haxroom.toml";

/// Config file named on the command line, else the per-user config file if present
pub fn config_path(arg: Option<String>) -> Option<PathBuf> {
    if let Some(arg) = arg {
        return Some(PathBuf::from(arg));
    }

    let dirs = ProjectDirs::from("", "", "haxroom")?;
    let path = dirs.config_dir().join(CONFIG_FILE);
    path.exists().then_some(path)
}

/// Load the configuration, falling back to defaults when there is no file
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    }
}
