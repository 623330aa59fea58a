//! Application settings
//!
//! Stored as camelCase JSON at `<config dir>/field-editor/settings.json`.
//! A missing file is created with defaults on first load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, info};

use crate::constants::config;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Root of the preset and fragment catalogs
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where `--definition` names without a directory are looked up
    #[serde(default = "default_definitions_dir")]
    pub definitions_dir: PathBuf,
}

fn app_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(config::APP_DIR);
    path
}

fn default_catalog_dir() -> PathBuf {
    app_dir().join(config::CATALOG_DIR)
}

fn default_log_level() -> String {
    config::DEFAULT_LOG_LEVEL.to_string()
}

fn default_definitions_dir() -> PathBuf {
    app_dir().join(config::DEFINITIONS_DIR)
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            catalog_dir: default_catalog_dir(),
            log_level: default_log_level(),
            definitions_dir: default_definitions_dir(),
        }
    }
}

impl AppSettings {
    pub fn path() -> PathBuf {
        app_dir().join(config::FILENAME)
    }

    /// Load settings from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Settings file not found, creating default at {:?}", path);
            let settings = AppSettings::default();
            settings.save_to(path)?;
            return Ok(settings);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let settings: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))?;

        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json).with_context(|| format!("Failed to write settings to {:?}", path))?;

        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Effective log level: `LOG_LEVEL` wins over the stored value
    pub fn log_level(&self) -> Level {
        let from_env = std::env::var("LOG_LEVEL").ok();
        parse_level(from_env.as_deref().unwrap_or(&self.log_level))
    }

    /// Resolve a definition argument: bare names live in `definitions_dir`
    pub fn definition_path(&self, name: &str) -> PathBuf {
        let path = PathBuf::from(name);
        if path.components().count() > 1 || path.is_absolute() {
            return path;
        }
        let mut resolved = self.definitions_dir.join(path);
        if resolved.extension().is_none() {
            resolved.set_extension("json");
        }
        resolved
    }
}

pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert!(path.exists());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"catalogDir\""));
        assert!(written.contains("\"logLevel\": \"info\""));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"catalogDir": "/srv/catalog"}"#).unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.catalog_dir, PathBuf::from("/srv/catalog"));
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.definitions_dir, default_definitions_dir());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();

        let err = AppSettings::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse JSON"));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_definition_path_resolution() {
        let settings = AppSettings {
            definitions_dir: PathBuf::from("/defs"),
            ..AppSettings::default()
        };
        assert_eq!(settings.definition_path("orb"), PathBuf::from("/defs/orb.json"));
        assert_eq!(settings.definition_path("./orb.json"), PathBuf::from("./orb.json"));
        assert_eq!(settings.definition_path("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
    }
}
