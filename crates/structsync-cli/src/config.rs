//! Optional TOML configuration.
//!
//! Precedence is flag, then config file, then built-in default. Relative
//! paths in the file resolve against the working directory.

use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "structsync.toml";
pub const DEFAULT_ENV: &str = "dev";
pub const DEFAULT_PATHS: &[&str] = &["data-structures"];

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub env: Option<String>,
    pub listing: Option<String>,
    pub paths: Option<Vec<String>>,
    pub org_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load `explicit` if given (it must exist), else `./structsync.toml`
    /// if present, else an empty config.
    pub fn load(explicit: Option<&str>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => DEFAULT_CONFIG_PATH,
            None => return Ok(Self::default()),
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_string(),
            source,
        })?;
        let config = Self::parse(&text, path)?;
        tracing::debug!(path, "loaded config");
        Ok(config)
    }

    pub fn parse(text: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: path.to_string(),
            source,
        })
    }

    pub fn resolve_env(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.env.clone())
            .unwrap_or_else(|| DEFAULT_ENV.to_string())
    }

    pub fn resolve_paths(&self, flag: Vec<String>) -> Vec<String> {
        if !flag.is_empty() {
            return flag;
        }
        self.paths
            .clone()
            .unwrap_or_else(|| DEFAULT_PATHS.iter().map(|p| p.to_string()).collect())
    }

    pub fn resolve_listing(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.listing.clone())
    }

    pub fn resolve_org_id(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.org_id.clone())
    }
}
