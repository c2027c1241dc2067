//! Optional TOML configuration
//!
//! Looked up at `--config <path>` or `<config home>/schwab-txf/config.toml`.
//! Every key is optional:
//!
//! ```toml
//! application = "Charles Schwab"
//! strict = false
//! atomic_output = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_APPLICATION: &str = "Charles Schwab";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Source identifier written to the TXF `A` line
    pub application: String,
    /// Exit non-zero when any row was skipped
    pub strict: bool,
    /// Write through a temporary file and rename on success
    pub atomic_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            application: DEFAULT_APPLICATION.to_string(),
            strict: false,
            atomic_output: true,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse configuration")
    }

    /// Load from an explicit path, else the default location, else defaults.
    /// Only an explicit path is required to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Config::default()),
            },
        };

        debug!("Loading configuration from {:?}", path);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid configuration file {}", path.display()))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("schwab-txf").join("config.toml"))
}
