//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `$ARLO_CONFIG` environment variable
//! 2. `~/.config/arlo/config.toml`
//! 3. Built-in defaults (everything is optional)

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub export: ExportConfig,
    pub progress: ProgressConfig,
}

/// Database storage settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database path. Default: platform-specific data dir.
    pub path: Option<String>,
}

/// Save-tool output settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for generated files. Default: system temp dir.
    pub dir: Option<String>,
}

/// Progress query settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Maximum sets returned per query.
    pub limit: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { limit: 200 }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config() -> Result<Config> {
    let path = config_path();

    if let Some(p) = &path {
        if p.exists() {
            let content =
                std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            let config: Config =
                toml::from_str(&content).with_context(|| format!("parsing {}", p.display()))?;
            return Ok(config);
        }
    }

    Ok(Config::default())
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(p) = std::env::var("ARLO_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // 2. ~/.config/arlo/config.toml
    if let Some(home) = dirs_home() {
        let p = home.join(".config").join("arlo").join("config.toml");
        return Some(p);
    }

    None
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Show the active config path (for `arlo config`).
pub fn show_config_path() -> String {
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}
