use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use volt_engine::{CrossOriginPolicy, GeminiSettings, ShellSettings};

use super::logging::LogDestination;

pub(crate) const CONFIG_FILENAME: &str = "volt.ron";

/// Environment variables checked, in order, for the assistant API key.
pub(crate) const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Startup settings read from `volt.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub download_seconds: u64,
    pub gemini_endpoint: String,
    pub gemini_model: String,
    pub allow_cross_origin_reads: bool,
    pub log_destination: LogDestination,
    /// File the key selector rereads when the backend rejects the current key.
    pub api_key_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let gemini = GeminiSettings::default();
        Self {
            download_seconds: ShellSettings::default().download_duration.as_secs(),
            gemini_endpoint: gemini.endpoint,
            gemini_model: gemini.model,
            allow_cross_origin_reads: false,
            log_destination: LogDestination::default(),
            api_key_file: None,
        }
    }
}

impl AppConfig {
    pub fn shell_settings(&self) -> ShellSettings {
        ShellSettings {
            download_duration: Duration::from_secs(self.download_seconds),
            ..ShellSettings::default()
        }
    }

    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            endpoint: self.gemini_endpoint.clone(),
            model: self.gemini_model.clone(),
            ..GeminiSettings::default()
        }
    }

    pub fn cross_origin_policy(&self) -> CrossOriginPolicy {
        if self.allow_cross_origin_reads {
            CrossOriginPolicy::Allow
        } else {
            CrossOriginPolicy::Deny
        }
    }
}

/// A missing file is not an error; it yields the defaults.
pub(crate) fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// First non-blank key from the environment, then from `key_file`.
pub(crate) fn initial_api_key(key_file: Option<&Path>) -> Option<String> {
    let from_env = API_KEY_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty());
    from_env.or_else(|| {
        let text = fs::read_to_string(key_file?).ok()?;
        let key = text.trim();
        (!key.is_empty()).then(|| key.to_string())
    })
}
