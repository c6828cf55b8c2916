//! Configuration file management for kbchat.
//!
//! Settings are layered: built-in defaults, then `~/.config/kbchat/config.toml`,
//! then `KBCHAT_*` environment variables. Command-line flags are applied on
//! top by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use kbchat_core::{ChatConfig, KbchatError, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_CHAT_PATH: &str = "/chat";
const DEFAULT_HEALTH_PATH: &str = "/api/health";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_chat_path() -> String {
    DEFAULT_CHAT_PATH.to_string()
}

fn default_health_path() -> String {
    DEFAULT_HEALTH_PATH.to_string()
}

/// Where the knowledge-base service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chat endpoint path; some deployments serve it under `/api/chat`.
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Request timeout. None by default: requests wait for the transport.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            health_path: default_health_path(),
            timeout_secs: None,
        }
    }
}

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Applies `KBCHAT_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("KBCHAT_BASE_URL") {
            self.endpoint.base_url = url;
        }
        if let Some(path) = lookup("KBCHAT_CHAT_PATH") {
            self.endpoint.chat_path = path;
        }
        if let Some(raw) = lookup("KBCHAT_CONFIDENCE_THRESHOLD") {
            self.chat.confidence_threshold = raw.trim().parse().map_err(|_| {
                KbchatError::config(format!("KBCHAT_CONFIDENCE_THRESHOLD is not a number: {raw}"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(KbchatError::config("endpoint.base_url is empty"));
        }
        self.chat.validate()
    }
}

/// Returns the kbchat configuration directory: ~/.config/kbchat
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| KbchatError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("kbchat"))
}

/// Returns the default configuration file: ~/.config/kbchat/config.toml
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the log directory: ~/.config/kbchat/logs
pub fn logs_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join("logs"))
}

/// Loads a configuration file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        KbchatError::config(format!(
            "Failed to read configuration file at {}: {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&content).map_err(|e| {
        KbchatError::config(format!(
            "Failed to parse configuration file at {}: {}",
            path.display(),
            e
        ))
    })
}

/// Loads the given file (or the default one) and applies environment overrides.
pub fn load_effective_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => load_config(&default_config_path()?)?,
    };
    config.apply_env()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.endpoint.chat_path, "/chat");
        assert!(config.endpoint.timeout_secs.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[endpoint]
base_url = "http://kb.internal:8080"
chat_path = "/api/chat"

[chat]
confidence_threshold = 0.7
send_context = false
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.endpoint.base_url, "http://kb.internal:8080");
        assert_eq!(config.endpoint.chat_path, "/api/chat");
        assert_eq!(config.endpoint.health_path, "/api/health");
        assert_eq!(config.chat.confidence_threshold, 0.7);
        assert!(!config.chat.send_context);
        assert_eq!(config.chat.context_window, 3);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[endpoint\nbase_url = ").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn environment_overrides_win() {
        let env = HashMap::from([
            ("KBCHAT_BASE_URL", "http://override:1"),
            ("KBCHAT_CONFIDENCE_THRESHOLD", "0.7"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.endpoint.base_url, "http://override:1");
        assert_eq!(config.chat.confidence_threshold, 0.7);
        assert_eq!(config.endpoint.chat_path, "/chat");
    }

    #[test]
    fn non_numeric_threshold_override_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(|key| (key == "KBCHAT_CONFIDENCE_THRESHOLD").then(|| "high".to_string()))
            .unwrap_err();
        assert!(err.is_config());
    }
}
