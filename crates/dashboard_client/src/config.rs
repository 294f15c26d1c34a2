//! Client configuration read from `dashboard.toml`, with environment
//! overrides for the values that differ per deployment.

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api-bag.vercel.app";
pub const API_URL_ENV: &str = "DASHBOARD_API_URL";
pub const API_KEY_ENV: &str = "DASHBOARD_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError
{
    #[error("failed to read config file {path}: {source}")]
    Read
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse
    {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig
{
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as the `x-api-key` header on every request.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String
{
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64
{
    30
}

impl Default for ClientConfig
{
    fn default() -> Self
    {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig
{
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError>
    {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the first `dashboard.toml` found in the working directory or
    /// `config/`, or the defaults when there is none.
    pub fn from_default_location() -> Result<Self, ConfigError>
    {
        let search_paths = [PathBuf::from("dashboard.toml"), PathBuf::from("config/dashboard.toml")];

        for path in search_paths {
            if path.exists() {
                debug!(path = %path.display(), "loading client configuration");
                return Self::from_file(&path);
            }
        }

        debug!("no dashboard.toml found, using defaults");
        Ok(Self::default())
    }

    pub fn with_env_overrides(self) -> Self
    {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Applies `DASHBOARD_API_URL` and `DASHBOARD_API_KEY` as returned by
    /// `lookup`. Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.base_url = base_url;
        }
        if let Some(api_key) = lookup(API_KEY_ENV).filter(|value| !value.trim().is_empty()) {
            self.api_key = api_key;
        }
        self
    }
}
