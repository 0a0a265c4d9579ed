//! Session configuration, stored as TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::DEFAULT_RETRIES;
use crate::table::DEFAULT_CAPACITY;

/// Settings for an interactive [crate::session::Session].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Retries allowed after a malformed value before the command is cancelled.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Capacity of the table created by `add` when none exists.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,

    /// Command prompt.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Print the command menu on startup.
    #[serde(default = "default_banner")]
    pub banner: bool,
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_initial_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_banner() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            initial_capacity: default_initial_capacity(),
            prompt: default_prompt(),
            banner: default_banner(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Loads [SessionConfig::default_config_path] if it exists, defaults otherwise.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/tabledb/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tabledb").join("config.toml"))
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }
}
