//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Resolve the root data folder, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. TAGDEX_ROOT environment variable
/// 3. `root_folder` key in the platform config file
/// 4. OS-dependent default data directory (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("TAGDEX_ROOT") {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&content) {
                if let Some(root) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root);
                }
            }
        }
    }

    // Priority 4: OS-dependent default
    default_root_folder()
}

/// Database file path inside the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("tagdex.db")
}

/// Locate the platform config file (user config dir, then system-wide)
fn find_config_file() -> Result<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("tagdex").join("config.toml")) {
        if path.exists() {
            return Ok(path);
        }
    }
    let system_config = PathBuf::from("/etc/tagdex/config.toml");
    if system_config.exists() {
        return Ok(system_config);
    }
    Err(Error::Config("No config file found".to_string()))
}

fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tagdex"))
        .unwrap_or_else(|| PathBuf::from("./tagdex_data"))
}
