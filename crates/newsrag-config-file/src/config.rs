//! Client settings: file formats, default lookup and `NEWSRAG_*` overrides
//!
//! The default config directory is `~/.newsrag`, or `$NEWSRAG_CONFIG_DIR`
//! when set.

use newsrag_core::{Error, Result};
use newsrag_egress::{HttpClientConfig, WebhookConfig, WebhookMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory under `$HOME` holding the config and session files
pub const DEFAULT_CONFIG_DIR: &str = ".newsrag";

/// Overrides the directory searched for a config file
pub const CONFIG_DIR_ENV: &str = "NEWSRAG_CONFIG_DIR";

const CONFIG_FILE_NAMES: [&str; 3] = ["config.yaml", "config.yml", "config.toml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub webhook: WebhookSettings,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend REST API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Answer-generation webhook; disabled while `url` is unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub payload: WebhookMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f64>,

    #[serde(default)]
    pub enable_web_search: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session file; `~` is expanded
    #[serde(default = "default_session_path")]
    pub storage_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: None,
        }
    }
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
            payload: WebhookMode::default(),
            similarity_threshold: None,
            enable_web_search: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_session_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ClientConfig {
    /// Parse a config file; `.toml` files are TOML, anything else YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound);
        }

        let contents = std::fs::read_to_string(path)?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
        };

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Directory searched when no config path is given
    pub fn config_dir() -> Option<PathBuf> {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
            _ => Some(dirs::home_dir()?.join(DEFAULT_CONFIG_DIR)),
        }
    }

    /// First config file found in `config_dir()`
    pub fn default_location() -> Option<PathBuf> {
        Self::find_in(&Self::config_dir()?)
    }

    /// First of `config.yaml`, `config.yml`, `config.toml` present in `dir`
    pub fn find_in(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Load settings from `path`, or from the default location when `None`,
    /// then apply environment overrides
    ///
    /// # Errors
    /// `Error::ConfigNotFound` only when an explicit `path` does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_location() {
                Some(found) => Self::from_file(found)?,
                None => Self::default(),
            },
        };

        config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("NEWSRAG_API_BASE_URL") {
            self.api.base_url = val;
        }

        if let Ok(val) = std::env::var("NEWSRAG_API_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %val, "Ignoring invalid NEWSRAG_API_TIMEOUT_SECS"),
            }
        }

        if let Ok(val) = std::env::var("NEWSRAG_WEBHOOK_URL") {
            self.webhook.url = (!val.trim().is_empty()).then_some(val);
        }

        if let Ok(val) = std::env::var("NEWSRAG_SESSION_FILE") {
            self.session.storage_path = val;
        }

        if let Ok(val) = std::env::var("NEWSRAG_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url must not be empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be positive".to_string()));
        }
        if let Some(threshold) = self.webhook.similarity_threshold
            && !(0.0..=1.0).contains(&threshold)
        {
            return Err(Error::Config(format!(
                "webhook.similarity_threshold must be within 0..=1, got {}",
                threshold
            )));
        }
        Ok(())
    }

    /// HTTP client settings for the backend gateway
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut config = HttpClientConfig {
            timeout_secs: self.api.timeout_secs,
            connect_timeout_secs: self.api.connect_timeout_secs,
            ..HttpClientConfig::default()
        };
        if let Some(user_agent) = &self.api.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }

    /// Webhook client settings, or `None` when no webhook URL is configured
    pub fn webhook_config(&self) -> Option<WebhookConfig> {
        let url = self.webhook.url.as_ref()?;
        Some(WebhookConfig {
            url: url.clone(),
            timeout_secs: self.webhook.timeout_secs,
            mode: self.webhook.payload,
            similarity_threshold: self.webhook.similarity_threshold,
            enable_web_search: self.webhook.enable_web_search,
        })
    }

    /// Session file path as configured; storage expands a leading `~`
    pub fn session_path(&self) -> PathBuf {
        PathBuf::from(&self.session.storage_path)
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_session_path() -> String {
    format!("~/{}/session.json", DEFAULT_CONFIG_DIR)
}

fn default_log_level() -> String {
    "info".to_string()
}
