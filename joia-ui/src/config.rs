//! Configuration for joia-ui
//!
//! Two-tier configuration in the usual Joia order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (`JOIA_BACKEND_URL`, `JOIA_ROOT_FOLDER`)
//! 3. TOML configuration file
//! 4. Built-in defaults
//!
//! The TOML file is bootstrap-only: the service must restart to pick up
//! changes.

use joia_common::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default HTTP port for the Library UI service.
pub const DEFAULT_PORT: u16 = 5741;

/// Default base URL of the external karaoke generation service.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Environment variable carrying the karaoke service base URL.
pub const BACKEND_URL_ENV_VAR: &str = "JOIA_BACKEND_URL";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root folder override (optional; env and compiled defaults apply
    /// when absent)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Base URL of the karaoke generation service (optional)
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            root_folder: None,
            backend_url: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Load the TOML config from `path`.
    ///
    /// A missing file is not an error: the service starts with built-in
    /// defaults. A file that exists but does not parse is a hard error,
    /// since silently ignoring a typo'd config is worse than refusing to
    /// start.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Default config file location for this service.
    pub fn default_path() -> PathBuf {
        joia_common::config::service_config_path("joia-ui")
    }
}

/// Resolve the karaoke service base URL from tiered configuration.
///
/// Priority: CLI argument → environment → TOML → built-in default.
/// Trailing slashes are trimmed so endpoint paths join cleanly.
pub fn resolve_backend_url(cli_arg: Option<&str>, toml_config: &TomlConfig) -> String {
    let env_url = std::env::var(BACKEND_URL_ENV_VAR).ok();

    let mut sources = Vec::new();
    if cli_arg.is_some() {
        sources.push("command line");
    }
    if env_url.is_some() {
        sources.push("environment");
    }
    if toml_config.backend_url.is_some() {
        sources.push("TOML");
    }
    if sources.len() > 1 {
        warn!(
            "Karaoke backend URL found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    let (url, source) = if let Some(url) = cli_arg {
        (url.to_string(), "command line")
    } else if let Some(url) = env_url {
        (url, "environment")
    } else if let Some(url) = &toml_config.backend_url {
        (url.clone(), "TOML config")
    } else {
        (DEFAULT_BACKEND_URL.to_string(), "built-in default")
    };

    info!("Karaoke backend URL loaded from {}: {}", source, url);
    url.trim_end_matches('/').to_string()
}
