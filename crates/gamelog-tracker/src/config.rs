use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::Deserialize;
use std::path::PathBuf;

use crate::cover::DEFAULT_MAX_DIMENSION;

/// Configuration for gamelog.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (GAMELOG_* prefix)
/// 3. Config file (~/.config/gamelog/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the SQLite store.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/library.db
    /// - ENV: GAMELOG_DATABASE_PATH
    /// - Config: database_path = "/path/to/library.db"
    /// - Default: ~/.local/share/gamelog/library.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Longest side, in pixels, that covers are shrunk to before storage.
    #[serde(default = "default_cover_max_dimension")]
    pub cover_max_dimension: u32,

    /// Logger options passed to twyg.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            cover_max_dimension: default_cover_max_dimension(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/gamelog/config.toml
    /// Reads environment variables with GAMELOG_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("gamelog");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with a custom store path (the --db CLI flag).
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }
}

/// Returns: ~/.local/share/gamelog/library.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gamelog")
        .join("library.db")
}

const fn default_cover_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/gamelog/config.toml
/// - macOS: ~/Library/Application Support/gamelog/config.toml
/// - Windows: %APPDATA%\gamelog\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gamelog")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Gamelog Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (GAMELOG_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite store holding games, platforms and cover images
#
# Can also be set via:
# - CLI: gamelog --db /custom/path.db list
# - Environment: GAMELOG_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/library.db"

# Covers are shrunk so neither side exceeds this many pixels, then stored
# as JPEG.
cover_max_dimension = 400

# Logger options (see the twyg documentation for every field)
#[logging]
#level = "debug"
#coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.database_path.as_os_str().is_empty());
        assert_eq!(config.cover_max_dimension, DEFAULT_MAX_DIMENSION);
    }

    #[test]
    fn test_config_with_custom_db_path() {
        let custom_path = PathBuf::from("/tmp/gamelog-test.db");
        let config = Config::load_with_db_path(custom_path.clone());
        assert!(config.is_ok());
        assert_eq!(config.unwrap().database_path, custom_path);
    }

    #[test]
    fn test_example_config_names_every_key() {
        let example = example_config();
        assert!(example.contains("database_path"));
        assert!(example.contains("cover_max_dimension"));
        assert!(example.contains("[logging]"));
    }
}
