//! Configuration loading and root folder resolution
//!
//! Every Joia service stores its database and generated assets under a
//! single root folder, resolved with the same priority order:
//! 1. Environment variable (`JOIA_ROOT_FOLDER`, then `JOIA_ROOT`)
//! 2. `root_folder` key in the shared TOML config file
//! 3. OS-dependent compiled default (fallback)
//!
//! Command-line overrides are applied by each service before consulting
//! the resolver.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variables consulted for the root folder, in priority order.
pub const ROOT_FOLDER_ENV_VARS: [&str; 2] = ["JOIA_ROOT_FOLDER", "JOIA_ROOT"];

/// File name of the shared database inside the root folder.
pub const DATABASE_FILE_NAME: &str = "joia.db";

/// Resolves the root folder for a service.
pub struct RootFolderResolver {
    module_name: String,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
        }
    }

    /// Resolve the root folder: environment → config file → compiled default.
    ///
    /// Never fails; a missing or unparsable config file degrades to the
    /// compiled default with a warning.
    pub fn resolve(&self) -> PathBuf {
        for var in ROOT_FOLDER_ENV_VARS {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    return PathBuf::from(path);
                }
            }
        }

        match root_folder_from_config_file() {
            Ok(Some(path)) => return path,
            Ok(None) => {}
            Err(e) => {
                warn!(
                    module = %self.module_name,
                    "Ignoring unreadable config file: {}", e
                );
            }
        }

        get_default_root_folder()
    }
}

/// Creates the root folder on first startup and derives paths inside it.
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the root folder directory if it does not exist yet.
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
        }
        Ok(())
    }

    /// Path of the shared SQLite database inside the root folder.
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

/// Read `root_folder` from the shared config file, if one exists.
fn root_folder_from_config_file() -> Result<Option<PathBuf>> {
    let config_path = match find_config_file() {
        Some(path) => path,
        None => return Ok(None),
    };

    let content = std::fs::read_to_string(&config_path)?;
    let config: toml::Value = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", config_path.display(), e)))?;

    Ok(config
        .get("root_folder")
        .and_then(|v| v.as_str())
        .map(PathBuf::from))
}

/// Locate the shared config file for the platform.
///
/// Linux also consults `/etc/joia/config.toml` for system-wide installs.
pub fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("joia").join("config.toml"));

    if let Some(path) = &user_config {
        if path.exists() {
            return Some(path.clone());
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/joia/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Default per-service config file path (`~/.config/joia/<module>.toml`).
pub fn service_config_path(module_name: &str) -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("joia").join(format!("{}.toml", module_name)))
        .unwrap_or_else(|| PathBuf::from(format!("{}.toml", module_name)))
}

/// OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/joia (or /var/lib/joia for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("joia"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/joia"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/joia
        dirs::data_dir()
            .map(|d| d.join("joia"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/joia"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\joia
        dirs::data_local_dir()
            .map(|d| d.join("joia"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\joia"))
    } else {
        PathBuf::from("./joia_data")
    }
}
