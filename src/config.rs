// ABOUTME: Configuration loading for chatlog.
// ABOUTME: Reads ~/.chatlog/config.toml (log directory, assistant name, backend command).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ChatError;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where transcripts are written. Defaults to `~/dev/chat/log`.
    pub log_dir: PathBuf,
    /// Speaker label for replies, in the transcript and on the console.
    pub assistant_name: String,
    pub backend: BackendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: Self::default_log_dir(),
            assistant_name: "Assistant".to_string(),
            backend: BackendConfig::default(),
        }
    }
}

/// How to invoke the external chat tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub command: String,
    /// Extra arguments placed before everything else on each call.
    pub args: Vec<String>,
    pub context_flag: String,
    pub token_flag: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            command: "chat".to_string(),
            args: Vec::new(),
            context_flag: "--context".to_string(),
            token_flag: "--token".to_string(),
        }
    }
}

impl Config {
    /// Load config from ~/.chatlog/config.toml, falling back to defaults.
    pub fn load() -> Result<Self, ChatError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ChatError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ChatError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ChatError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn home() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Directory holding chatlog's own files.
    pub fn config_dir() -> PathBuf {
        Self::home().join(".chatlog")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Path to the secrets file loaded into the environment before the backend runs.
    pub fn secrets_env_path() -> PathBuf {
        Self::config_dir().join(".env")
    }

    pub fn default_log_dir() -> PathBuf {
        Self::home().join("dev").join("chat").join("log")
    }
}
