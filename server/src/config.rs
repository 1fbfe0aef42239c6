use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use gh_proxy_core::{GitHubConfig, DEFAULT_API_BASE_URL};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "gh-proxy.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Top-level configuration: an optional TOML file, overridden by environment
/// variables. Everything except the GitHub credentials has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub github: GitHubSection,
    pub cors: CorsConfig,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Timeout for each outbound call to the remote API.
    pub request_timeout_secs: u64,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GitHubSection {
    pub token: Option<String>,
    pub username: Option<String>,
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            github: GitHubSection::default(),
            cors: CorsConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            request_timeout_secs: 10,
        }
    }
}

impl Default for GitHubSection {
    fn default() -> Self {
        Self {
            token: None,
            username: None,
            api_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
        }
    }
}

impl std::fmt::Debug for GitHubSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSection")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    /// Load from `path`, or from `gh-proxy.toml` in the current directory if
    /// it exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load_from(default)?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a specific path without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply `PORT`, `GITHUB_TOKEN`, `GITHUB_USERNAME`, `GITHUB_API_URL`,
    /// `ALLOW_ORIGINS`, `LOG_LEVEL` and `REQUEST_TIMEOUT_SECS`. Empty values
    /// count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port })?;
        }
        if let Some(secs) = get("REQUEST_TIMEOUT_SECS") {
            self.server.request_timeout_secs = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_SECS",
                value: secs,
            })?;
        }
        if let Some(token) = get("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(username) = get("GITHUB_USERNAME") {
            self.github.username = Some(username);
        }
        if let Some(url) = get("GITHUB_API_URL") {
            self.github.api_url = url;
        }
        if let Some(origins) = get("ALLOW_ORIGINS") {
            self.cors.allow_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    /// The immutable remote settings. Fails when the token or the account
    /// name is missing.
    pub fn github_config(&self) -> Result<Arc<GitHubConfig>, ConfigError> {
        let token = non_empty(&self.github.token).ok_or(ConfigError::Missing("GITHUB_TOKEN"))?;
        let username = non_empty(&self.github.username).ok_or(ConfigError::Missing("GITHUB_USERNAME"))?;
        Ok(Arc::new(
            GitHubConfig::new(token, username).with_api_base_url(self.github.api_url.clone()),
        ))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
