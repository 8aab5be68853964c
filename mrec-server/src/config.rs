//! Configuration resolution for mrec-server
//!
//! Priority for each setting: command line / environment → TOML → default.
//! Command-line flags and their environment fallbacks arrive pre-merged in
//! `CliOverrides` (clap handles `env = ...`). The recognition credentials have
//! no flag and are resolved here, environment first, then TOML.

use mrec_common::config::{is_valid_value, TomlConfig};
use mrec_common::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::services::recognition_client::{RecognitionEndpoint, DEFAULT_TIMEOUT};

/// Module name, also the config file stem
pub const MODULE_NAME: &str = "mrec-server";

pub const ENV_RAPIDAPI_HOST: &str = "RAPIDAPI_HOST";
pub const ENV_RAPIDAPI_KEY: &str = "RAPIDAPI_KEY";
pub const ENV_RECOGNITION_URL: &str = "MREC_RECOGNITION_URL";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_RECORDINGS_DIR: &str = "recordings";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Values supplied on the command line or through their environment variables
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub recordings_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub max_upload_bytes: Option<usize>,
    pub strict_status_codes: Option<bool>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub endpoint: RecognitionEndpoint,
    pub recordings_dir: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Answer "not recognized" with 404 instead of the historical 200
    pub strict_status_codes: bool,
    pub log_level: String,
}

impl ServiceConfig {
    pub fn resolve(cli: &CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let host = resolve_credential(ENV_RAPIDAPI_HOST, toml_config.rapidapi_host.as_deref())?;
        let key = resolve_credential(ENV_RAPIDAPI_KEY, toml_config.rapidapi_key.as_deref())?;

        let mut endpoint = RecognitionEndpoint::for_host(host, key);
        let url_override = std::env::var(ENV_RECOGNITION_URL)
            .ok()
            .filter(|url| is_valid_value(url))
            .or_else(|| {
                toml_config
                    .recognition_url
                    .clone()
                    .filter(|url| is_valid_value(url))
            })
            .map(|url| url.trim().to_string());
        if let Some(url) = url_override {
            info!(url = %url, "Recognition endpoint overridden");
            endpoint = endpoint.with_url(url);
        }

        let request_timeout = cli
            .request_timeout_secs
            .or(toml_config.request_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        if request_timeout.is_zero() {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            recordings_dir: cli
                .recordings_dir
                .clone()
                .or_else(|| toml_config.recordings_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDINGS_DIR)),
            bind_address: cli
                .bind_address
                .clone()
                .or_else(|| toml_config.bind_address.clone())
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: cli.port.or(toml_config.port).unwrap_or(DEFAULT_PORT),
            request_timeout,
            max_upload_bytes: cli
                .max_upload_bytes
                .or(toml_config.max_upload_bytes)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            strict_status_codes: cli
                .strict_status_codes
                .or(toml_config.strict_status_codes)
                .unwrap_or(false),
            log_level: toml_config.logging.level.clone(),
        })
    }

    /// `bind_address:port`
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Resolve a required credential from the environment or TOML
///
/// **Priority:** ENV → TOML. Blank values count as absent; surrounding
/// whitespace is stripped.
pub fn resolve_credential(env_name: &str, toml_value: Option<&str>) -> Result<String> {
    let env_value = std::env::var(env_name)
        .ok()
        .filter(|v| is_valid_value(v))
        .map(|v| v.trim().to_string());
    let toml_value = toml_value.filter(|v| is_valid_value(v)).map(str::trim);

    match (env_value, toml_value) {
        (Some(env_value), Some(_)) => {
            warn!(
                "{} found in both environment and TOML config. Using environment (highest priority).",
                env_name
            );
            Ok(env_value)
        }
        (Some(env_value), None) => {
            info!("{} loaded from environment variable", env_name);
            Ok(env_value)
        }
        (None, Some(toml_value)) => {
            info!("{} loaded from TOML config", env_name);
            Ok(toml_value.to_string())
        }
        (None, None) => Err(Error::Config(format!(
            "{} not configured. Please configure using one of:\n\
             1. Environment (or .env file): {}=...\n\
             2. TOML config: ~/.config/mrec/{}.toml ({} = \"...\")",
            env_name,
            env_name,
            MODULE_NAME,
            env_name.to_lowercase()
        ))),
    }
}
