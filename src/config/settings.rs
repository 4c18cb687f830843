//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

/// Environment variables consulted, in order, when `llm.api_key` is blank.
const API_KEY_ENV_VARS: [&str; 2] = ["MEDSCRIBE_OPENAI_API_KEY", "OPENAI_API_KEY"];

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Web front-end settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Completion backend settings
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address the web front-end listens on (`host:port`; hostnames are resolved)
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Largest accepted form body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Completion provider (openai)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where loaded settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl ConfigSource {
    fn of(config_path: &Path) -> Self {
        if config_path.exists() {
            ConfigSource::File(config_path.to_path_buf())
        } else {
            ConfigSource::Defaults
        }
    }
}

impl Settings {
    /// Load settings from the configuration file.
    ///
    /// Runs before logging is configured, so the source is returned for the
    /// caller to report.
    pub fn load() -> Result<(Self, ConfigSource)> {
        let config_path = Self::config_path()?;
        let source = ConfigSource::of(&config_path);
        let mut settings = Self::load_from(&config_path)?;
        settings.apply_env_overrides(|name| std::env::var(name).ok());
        Ok((settings, source))
    }

    /// Load settings from an explicit path, falling back to defaults when the
    /// file does not exist. Environment overrides are not applied.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    /// Fill a blank API key from the environment.
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if !self.llm.api_key.trim().is_empty() {
            return;
        }

        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|key| !key.trim().is_empty())
        {
            self.llm.api_key = key;
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "medscribe", "medscribe")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the configured listen address, taking the first result
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .to_socket_addrs()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?
            .next()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))
    }

    /// Whether a non-blank API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.llm.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_openai_gpt_4o() {
        let settings = Settings::default();
        assert_eq!(settings.llm.provider, "openai");
        assert_eq!(settings.llm.model, "gpt-4o");
        assert_eq!(settings.llm.timeout_secs, 600);
        assert!(!settings.has_api_key());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings.server.bind, "127.0.0.1:5000");
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nmodel = \"gpt-4o-mini\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.llm.provider, "openai");
        assert_eq!(settings.server.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm\nmodel = ").unwrap();

        let err = Settings::load_from(&path).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn written_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Settings::write_default(&path).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.llm.model, "gpt-4o");
    }

    #[test]
    fn env_key_prefers_app_specific_variable() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(|name| match name {
            "MEDSCRIBE_OPENAI_API_KEY" => Some("app-key".to_string()),
            "OPENAI_API_KEY" => Some("generic-key".to_string()),
            _ => None,
        });
        assert_eq!(settings.llm.api_key, "app-key");
    }

    #[test]
    fn env_key_falls_back_to_generic_variable() {
        let mut settings = Settings::default();
        settings.apply_env_overrides(|name| match name {
            "MEDSCRIBE_OPENAI_API_KEY" => Some("   ".to_string()),
            "OPENAI_API_KEY" => Some("generic-key".to_string()),
            _ => None,
        });
        assert_eq!(settings.llm.api_key, "generic-key");
    }

    #[test]
    fn configured_key_is_not_overridden() {
        let mut settings = Settings::default();
        settings.llm.api_key = "from-file".to_string();
        settings.apply_env_overrides(|_| Some("from-env".to_string()));
        assert_eq!(settings.llm.api_key, "from-file");
    }

    #[test]
    fn config_source_reflects_file_presence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(ConfigSource::of(&path), ConfigSource::Defaults);

        std::fs::write(&path, "").unwrap();
        assert_eq!(ConfigSource::of(&path), ConfigSource::File(path.clone()));
    }

    #[test]
    fn ip_bind_address_is_accepted() {
        let mut settings = Settings::default();
        settings.server.bind = "0.0.0.0:8080".to_string();
        assert_eq!(settings.bind_addr().unwrap(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn hostname_bind_address_is_resolved() {
        let mut settings = Settings::default();
        settings.server.bind = "localhost:5000".to_string();

        let addr = settings.bind_addr().unwrap();
        assert_eq!(addr.port(), 5000);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        let mut settings = Settings::default();
        settings.server.bind = "not an address".to_string();
        assert!(settings.bind_addr().is_err());
    }
}
