//! Configuration loading and root folder resolution
//!
//! The root folder holds everything the service persists: the SQLite
//! database and the downloaded image assets.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no CLI argument is given.
pub const ROOT_FOLDER_ENV: &str = "VOCABOX_ROOT_FOLDER";

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Create the root folder (and its `assets` subdirectory) if missing.
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)
        .map_err(|e| Error::Config(format!("Cannot create root folder {}: {}", root.display(), e)))?;
    std::fs::create_dir_all(assets_dir(root))
        .map_err(|e| Error::Config(format!("Cannot create assets folder: {}", e)))?;
    Ok(())
}

/// Path of the service database inside the root folder.
pub fn database_path(root: &Path) -> PathBuf {
    root.join("vocabox.db")
}

/// Path of the static-asset directory inside the root folder.
///
/// Files written below this directory are served under the `/assets`
/// URL prefix.
pub fn assets_dir(root: &Path) -> PathBuf {
    root.join("assets")
}

/// Locate the platform configuration file, if one exists.
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // ~/.config/vocabox/config.toml first, then /etc/vocabox/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("vocabox").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/vocabox/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("vocabox").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("vocabox"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/vocabox"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("vocabox"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/vocabox"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("vocabox"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\vocabox"))
    } else {
        PathBuf::from("./vocabox_data")
    }
}
