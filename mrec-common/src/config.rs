//! Configuration file loading and path resolution
//!
//! Configuration priority for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! This module owns tier 3: locating and parsing the TOML file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under the platform config dir that holds mrec config files
const CONFIG_DIR_NAME: &str = "mrec";

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is not set (e.g., "info", "debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Contents of `mrec-server.toml`
///
/// Every field is optional; a missing file is equivalent to an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Recognition service hostname (also sent as the host header)
    pub rapidapi_host: Option<String>,
    /// Recognition service credential
    pub rapidapi_key: Option<String>,
    /// Full recognition endpoint URL, overriding the one derived from the host
    pub recognition_url: Option<String>,
    /// Directory that receives stored recordings
    pub recordings_dir: Option<PathBuf>,
    /// Address the HTTP server binds to
    pub bind_address: Option<String>,
    /// Port the HTTP server listens on
    pub port: Option<u16>,
    /// Upper bound on a single recognition call, in seconds
    pub request_timeout_secs: Option<u64>,
    /// Largest accepted upload body, in bytes
    pub max_upload_bytes: Option<usize>,
    /// Answer "not recognized" with 404 instead of 200
    pub strict_status_codes: Option<bool>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default config file path for a module: `<config_dir>/mrec/<module>.toml`
///
/// Returns `None` when the platform has no config directory.
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(format!("{}.toml", module_name)))
}

/// Load a TOML config file
///
/// A missing file yields `TomlConfig::default()`. A file that exists but cannot
/// be read or parsed is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;

    parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Parse TOML config content
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Validate a configured value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}
