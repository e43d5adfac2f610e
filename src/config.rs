//! Driver configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [binder]
//! tag_name = "json"
//!
//! [connection]
//! timeout_ms = 5000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::binder::DEFAULT_TAG_NAME;
use crate::error::{SurrealError, SurrealResult};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "surreal-sql.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub binder: BinderConfig,
    pub connection: ConnConfig,
}

/// How entity fields are turned into named arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Tag read from entity field tables
    pub tag_name: String,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_TAG_NAME.to_string(),
        }
    }
}

/// Per-connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnConfig {
    /// Upper bound for a single transport call; unset means no limit
    pub timeout_ms: Option<u64>,
}

impl ConnConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> SurrealResult<Self> {
        toml::from_str(content).map_err(|e| SurrealError::Config(e.to_string()))
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SurrealResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Candidate config paths, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("surreal-sql").join("config.toml"));
        }
        paths
    }

    /// Load the first config file found, or defaults if there is none.
    pub fn discover() -> SurrealResult<Self> {
        match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> SurrealResult<String> {
        toml::to_string_pretty(self).map_err(|e| SurrealError::Config(e.to_string()))
    }
}
