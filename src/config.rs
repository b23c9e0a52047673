use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::risk::DEFAULT_PAGE_SIZE;

/// Application-level constants
pub const APP_NAME: &str = "ClinicRisk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "CLINIC_RISK_CONFIG";

pub const DEFAULT_PREVALENCE_TOP_N: usize = 5;

/// Get the application data directory
/// ~/ClinicRisk/ on all platforms; the working directory when no home is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Directory holding the four upstream JSON collections.
pub fn default_data_dir() -> PathBuf {
    app_data_dir().join("data")
}

pub fn default_config_path() -> PathBuf {
    app_data_dir().join("config.json")
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "clinic_risk_lib=info,tower_http=info"
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8787))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub cohort_page_size: usize,
    pub prevalence_top_n: usize,
    /// Departments always reported, even with no registered patients.
    pub departments: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cohort_page_size: DEFAULT_PAGE_SIZE,
            prevalence_top_n: DEFAULT_PREVALENCE_TOP_N,
            departments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_addr: default_bind_addr(),
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `$CLINIC_RISK_CONFIG`, else `~/ClinicRisk/config.json`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        Self::load_from(&path)
    }

    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
