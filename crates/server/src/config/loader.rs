//! Configuration file loading and parsing
//!
//! Loads Doxify configuration from RON files, searching the standard
//! locations, then applies environment overrides.

use super::{Config, Storage};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Standard config file names to search for
const CONFIG_FILENAMES: &[&str] = &["doxify.ron", ".doxify/config.ron"];

/// Load configuration from a specific file path
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_ron(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration with automatic file discovery
///
/// Searches for config files in the following locations (in order):
/// 1. Path specified in DOXIFY_CONFIG_PATH environment variable
/// 2. doxify.ron in current directory
/// 3. .doxify/config.ron relative to current directory
///
/// Falls back to defaults when nothing is found. Environment overrides are
/// applied and the result is validated before returning.
pub fn load_with_discovery() -> Result<Config> {
    let mut config = discover()?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

fn discover() -> Result<Config> {
    if let Ok(env_path) = std::env::var("DOXIFY_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            tracing::info!("Loading config from DOXIFY_CONFIG_PATH: {}", path.display());
            return load_from_file(&path);
        } else {
            tracing::warn!(
                "DOXIFY_CONFIG_PATH specified but file not found: {}",
                path.display()
            );
        }
    }

    for filename in CONFIG_FILENAMES {
        let path = PathBuf::from(filename);
        if path.exists() {
            tracing::info!("Loading config from: {}", path.display());
            return load_from_file(&path);
        }
    }

    tracing::info!("No config file found, using defaults");
    Ok(Config::default())
}

/// Apply `PORT`, `DOXIFY_PAGES_DIR` and `DOXIFY_DB_PATH` overrides.
///
/// `DOXIFY_DB_PATH` wins when both storage variables are set.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
        let host = config
            .server
            .bind
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.server.bind = format!("{}:{}", host, port.trim());
    }

    if let Some(dir) = lookup("DOXIFY_PAGES_DIR").filter(|d| !d.is_empty()) {
        config.storage = Storage::Files {
            dir: PathBuf::from(dir),
        };
    }

    if let Some(path) = lookup("DOXIFY_DB_PATH").filter(|p| !p.is_empty()) {
        config.storage = Storage::Sqlite {
            path: PathBuf::from(path),
        };
    }
}

/// Parse RON configuration string
fn parse_ron(content: &str) -> Result<Config> {
    ron::from_str(content).context("Failed to parse RON configuration")
}
