use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::retry::{PolicyError, RetryPolicy};

/// Environment variable overriding `remote.url`.
pub const ENV_URL: &str = "HOMEFEED_SUPABASE_URL";
/// Environment variable overriding `remote.anon_key`.
pub const ENV_ANON_KEY: &str = "HOMEFEED_SUPABASE_ANON_KEY";

/// Startup configuration failure. Fatal: reported before any fetch is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing remote endpoint URL; set remote.url in config.toml or {}", ENV_URL)]
    MissingUrl,
    #[error("missing remote access key; set remote.anon_key in config.toml or {}", ENV_ANON_KEY)]
    MissingAnonKey,
    #[error("invalid remote endpoint URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("remote endpoint URL must use http or https (got {0:?})")]
    UnsupportedScheme(String),
    #[error("remote table name must not be empty")]
    EmptyTable,
    #[error("invalid retry settings: {0}")]
    Retry(#[from] PolicyError),
}

/// Remote store connection parameters (`[remote]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Anonymous (public) API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
    /// Table holding the features.
    pub table: String,
    /// Value sent as `X-Client-Info`.
    pub client_info: String,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout enforced by the HTTP client.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: "home_features".to_string(),
            client_info: concat!("homefeed/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 10,
            timeout_secs: 30,
        }
    }
}

/// Validated remote parameters, ready for the REST store.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSettings {
    /// Endpoint base; path always ends with `/`.
    pub base_url: Url,
    pub anon_key: String,
    pub table: String,
    pub client_info: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Replace `url`/`anon_key` with non-empty values from `lookup`
    /// (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            self.url = Some(url);
        }
        if let Some(key) = lookup(ENV_ANON_KEY).filter(|v| !v.trim().is_empty()) {
            self.anon_key = Some(key);
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Validate and convert into [`RemoteSettings`].
    pub fn resolve(&self) -> Result<RemoteSettings, ConfigError> {
        let raw_url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingUrl)?;
        let anon_key = self
            .anon_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingAnonKey)?;
        if self.table.trim().is_empty() {
            return Err(ConfigError::EmptyTable);
        }

        let mut base_url = Url::parse(raw_url).map_err(|e| ConfigError::InvalidUrl {
            url: raw_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        if base_url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl {
                url: raw_url.to_string(),
                reason: "missing host".to_string(),
            });
        }
        base_url.set_query(None);
        base_url.set_fragment(None);
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(RemoteSettings {
            base_url,
            anon_key: anon_key.to_string(),
            table: self.table.trim().to_string(),
            client_info: self.client_info.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

/// Retry policy parameters (`[retry]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound on the un-jittered delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier applied per attempt; must be > 1.
    pub backoff_factor: f64,
    /// Perturb each delay by up to ±25%.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy, PolicyError> {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            self.backoff_factor,
            self.jitter,
        )
    }
}

/// Global configuration loaded from `~/.config/homefeed/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomefeedConfig {
    /// Probe the endpoint before each list call (inside the same retried operation).
    #[serde(default)]
    pub precheck_connectivity: bool,
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

impl HomefeedConfig {
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        Ok(self.retry.clone().unwrap_or_default().to_policy()?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("homefeed")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from `path`, creating a default file if none exists.
pub fn load_or_init_at(path: &Path) -> Result<HomefeedConfig> {
    if !path.exists() {
        let default_cfg = HomefeedConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: HomefeedConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Load the XDG config file (created with defaults on first run) and apply
/// environment overrides.
pub fn load_or_init() -> Result<HomefeedConfig> {
    let mut cfg = load_or_init_at(&config_path()?)?;
    cfg.remote.apply_env_overrides();
    Ok(cfg)
}
