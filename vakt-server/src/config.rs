//! Server configuration
//!
//! Resolution priority per setting: command-line argument, environment
//! variable (handled by clap), TOML config file, compiled default.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use vakt_common::config::{default_config_path, KvConfig};

/// Default upstream endpoint for live seismic data
pub const DEFAULT_SEISMIC_API_URL: &str = "https://api.vedur.is/skjalftalisa/v1/quake/array";

/// Default upstream endpoint for historical seismic data
pub const DEFAULT_HISTORY_API_URL: &str = "https://api.vedur.is/skjalftalisa/v1/quake/history";

const DEFAULT_PORT: u16 = 5780;
const DEFAULT_HEARTBEAT_SECS: u64 = 30;
const DEFAULT_HISTORY_TIMEOUT_SECS: u64 = 15;

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub kv: KvConfig,
    pub seismic_api_url: String,
    pub history_api_url: String,
    /// SSE keep-alive comment interval
    pub heartbeat_secs: u64,
    /// Hard timeout on the historical-data path before synthetic fallback
    pub history_timeout_secs: u64,
    /// When set, mutating routes require a matching x-admin-token header
    pub admin_token: Option<String>,
}

/// CLI/env values that override the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub config_file: Option<PathBuf>,
    pub seismic_api_url: Option<String>,
    pub history_api_url: Option<String>,
    pub heartbeat_secs: Option<u64>,
    pub admin_token: Option<String>,
}

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
struct FileSettings {
    port: Option<u16>,
    seismic_api_url: Option<String>,
    history_api_url: Option<String>,
    heartbeat_secs: Option<u64>,
    admin_token: Option<String>,
}

fn load_file_settings(path: &Path) -> Result<FileSettings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

impl Config {
    /// Resolve the full configuration
    ///
    /// Store credentials always come from the environment; everything
    /// else merges overrides over the config file over defaults.
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let kv = KvConfig::from_env().map_err(|e| Error::Config(e.to_string()))?;

        let file = match overrides.config_file.clone().or_else(default_config_path) {
            Some(path) => {
                info!("Loading config file: {}", path.display());
                load_file_settings(&path)?
            }
            None => FileSettings::default(),
        };

        Ok(Config {
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            kv,
            seismic_api_url: overrides
                .seismic_api_url
                .or(file.seismic_api_url)
                .unwrap_or_else(|| DEFAULT_SEISMIC_API_URL.to_string()),
            history_api_url: overrides
                .history_api_url
                .or(file.history_api_url)
                .unwrap_or_else(|| DEFAULT_HISTORY_API_URL.to_string()),
            heartbeat_secs: overrides
                .heartbeat_secs
                .or(file.heartbeat_secs)
                .unwrap_or(DEFAULT_HEARTBEAT_SECS),
            history_timeout_secs: DEFAULT_HISTORY_TIMEOUT_SECS,
            admin_token: overrides.admin_token.or(file.admin_token),
        })
    }
}
