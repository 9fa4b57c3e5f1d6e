//! Configuration handling for Memoir
//!
//! Configuration is stored in `config.toml` under the user config
//! directory. Every field has a default; a missing file is not an error.
//! The resolved configuration is passed into the vault and engines at
//! construction - there is no process-wide configuration state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("No vault configured. Pass --vault, set MEMOIR_VAULT, or set vault_dir in config.toml.")]
    NoVault,
}

/// Settings for the external narrative generator
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NarrativeConfig {
    /// External command invoked with the composed prompt as its single
    /// argument; stdout becomes the narrative. Unset means the built-in
    /// template fallback.
    pub command: Option<String>,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vault root directory
    pub vault_dir: Option<PathBuf>,

    /// Profile document file name, relative to the vault root
    pub profile_file: String,

    /// Topic subdirectory name, relative to the vault root
    pub topics_dir: String,

    /// Optional priority-guidance document, relative to the vault root
    pub guidance_file: Option<String>,

    /// Narrative generator settings
    pub narrative: NarrativeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault_dir: None,
            profile_file: "Profile.md".to_string(),
            topics_dir: "Topics".to_string(),
            guidance_file: None,
            narrative: NarrativeConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default location
    pub fn load() -> Result<Self> {
        let config_dir = match Self::config_dir() {
            Some(dir) => dir,
            None => return Ok(Config::default()),
        };

        Self::load_from(&config_dir.join("config.toml"))
    }

    /// Loads configuration from a specific file, defaulting when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse config")
    }

    /// Returns the user config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "memoir", "memoir-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Resolves the vault root: CLI/env override first, then config
    pub fn resolve_vault(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.vault_dir.clone())
            .ok_or_else(|| ConfigError::NoVault.into())
    }
}
