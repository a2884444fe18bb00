//! Server configuration types.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root directory used when none is configured.
pub const DEFAULT_ROOT: &str = "target";

/// Address the server binds to when none is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Configuration for a dirserve instance.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// Directory all served paths are confined to.
    #[builder(default = "default_root()")]
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Socket address for the HTTP listener.
    #[builder(default = "default_bind()")]
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Perform real filesystem writes for create/upload/replace.
    ///
    /// When disabled the mutation endpoints validate the path and
    /// acknowledge without touching the disk.
    #[builder(default = "false")]
    #[serde(default)]
    pub writes_enabled: bool,

    /// Include hidden entries (starting with .) in listings.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_true() -> bool {
    true
}

impl ServeConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl ServeConfig {
    /// Create a new config builder.
    pub fn builder() -> ServeConfigBuilder {
        ServeConfigBuilder::default()
    }

    /// Create a config serving the given root with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Parse a config from TOML text.
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "Root path cannot be empty".to_string(),
            });
        }

        Ok(config)
    }

    /// Load a config from a TOML file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml(path, &content)
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            bind: default_bind(),
            writes_enabled: false,
            include_hidden: true,
        }
    }
}
