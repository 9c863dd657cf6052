//! Configuration for serline.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.serline/config.toml`
//! - Editor limits (line capacity, argument count) and prompt text
//! - Log settings for the host binary
//!
//! # Configuration File
//!
//! ```toml
//! [editor]
//! # Line storage in bytes, one slot is kept for the terminator
//! capacity = 120
//! # Arguments passed to a command, the command name included
//! max_args = 4
//! # Printable ASCII only; its length is the column offset of the line
//! prompt = ">"
//!
//! [log]
//! level = "info"
//! file = "/tmp/serline.log"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widest prompt that still leaves a column for the cursor
pub const MAX_PROMPT_WIDTH: usize = 254;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write config {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Line capacity must be at least 3, got {0}")]
    CapacityTooSmall(usize),

    #[error("max_args must be at least 1")]
    NoArguments,

    #[error("Prompt must be 1 to 254 printable ASCII characters")]
    InvalidPrompt,

    #[error("Could not determine config path")]
    NoConfigPath,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Line editor settings
    pub editor: EditorConfig,
    /// Log settings
    pub log: LogConfig,
}

/// Line editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub capacity: usize,
    pub max_args: usize,
    pub prompt: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            capacity: 120,
            max_args: 4,
            prompt: ">".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity < 3 {
            return Err(ConfigError::CapacityTooSmall(self.capacity));
        }
        if self.max_args == 0 {
            return Err(ConfigError::NoArguments);
        }
        let printable = self.prompt.bytes().all(|b| (0x20..=0x7E).contains(&b));
        if self.prompt.is_empty() || self.prompt.len() > MAX_PROMPT_WIDTH || !printable {
            return Err(ConfigError::InvalidPrompt);
        }
        Ok(())
    }
}

/// Log configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` level filter: error, warn, info, debug, trace
    pub level: String,
    /// Log file, defaults to `~/.serline/serline.log`
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .or_else(|| config_dir().map(|d| d.join("serline.log")))
            .unwrap_or_else(|| PathBuf::from("serline.log"))
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file yields the defaults. A file that cannot be read or
    /// parsed also yields the defaults, and the error is handed back so the
    /// caller can report it once logging is up.
    pub fn load() -> (Self, Option<ConfigError>) {
        match Self::get_config_path() {
            Some(path) => Self::load_or_default(&path),
            None => (Self::default(), None),
        }
    }

    /// Load `path` if it exists, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load and validate configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.editor.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::get_config_path().ok_or(ConfigError::NoConfigPath)?;
        self.save_to(&path)
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        config_dir().map(|d| d.join("config.toml"))
    }
}

fn config_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".serline"))
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
