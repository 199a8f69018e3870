use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::model::config::CoreConfig;

pub const CONFIG_ENV: &str = "LINGUIST_CONFIG";
pub const TREAT_EMPTY_ENV: &str = "LINGUIST_TREAT_EMPTY_AS_MISSING";
const CONFIG_FILE: &str = "linguist.json";

fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        if !p.trim().is_empty() {
            return Some(PathBuf::from(p));
        }
    }

    let local = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE);
    local.exists().then_some(local)
}

/// Resolves the effective config: file (if any), then environment overrides.
pub fn load() -> Result<CoreConfig, ConfigError> {
    let mut config = match config_path() {
        Some(path) => load_from(&path)?,
        None => CoreConfig::default(),
    };

    if let Ok(v) = std::env::var(TREAT_EMPTY_ENV) {
        config.treat_empty_as_missing = parse_flag(&v);
    }

    Ok(config)
}

pub fn load_from(path: &Path) -> Result<CoreConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config: CoreConfig =
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    // Relative catalog dirs are relative to the config file, not the cwd.
    if let Some(parent) = path.parent() {
        let dir = Path::new(&config.catalog_dir);
        if dir.is_relative() && !parent.as_os_str().is_empty() {
            config.catalog_dir = parent.join(dir).to_string_lossy().to_string();
        }
    }

    if config.default_language.trim().is_empty() {
        config.default_language = CoreConfig::default().default_language;
    }

    Ok(config)
}

fn parse_flag(v: &str) -> bool {
    matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
