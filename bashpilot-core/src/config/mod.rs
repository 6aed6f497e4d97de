//! Flat key/value configuration stored in `~/.bashpilot/config.json`
//!
//! The only key the core consults is the model endpoint URL; everything else
//! is passed through untouched so the file stays forward compatible.

pub mod constants;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use self::constants::{config_keys, files};

/// Raw configuration contents: a flat string-to-string map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigData {
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

/// Configuration store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    data: ConfigData,
}

impl ConfigStore {
    /// Open the configuration in the user's dot directory, creating the
    /// directory if needed. A missing file yields an empty map.
    pub fn open_default() -> Result<Self> {
        Self::open(dot_dir()?.join(files::CONFIG_FILE))
    }

    /// Open the configuration at an explicit path
    pub fn open(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            ConfigData::default()
        };

        Ok(Self { path, data })
    }

    /// Look up a configuration value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.values.get(key).map(String::as_str)
    }

    /// Set a configuration value in memory; call [`ConfigStore::save`] to persist
    pub fn set(&mut self, key: &str, value: &str) {
        self.data.values.insert(key.to_string(), value.to_string());
    }

    /// The configured model endpoint URL, if any
    pub fn endpoint(&self) -> Option<&str> {
        self.get(config_keys::ENDPOINT)
    }

    /// Write the configuration back to disk as pretty JSON
    pub fn save(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize config")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config file {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolve the bashpilot dot directory, creating it if missing
pub fn dot_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().context("Could not determine home directory")?;

    let dir = home_dir.join(files::DOT_DIR);
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {} directory", dir.display()))?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_empty_map() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::open(dir.path().join("config.json")).unwrap();
        assert!(store.endpoint().is_none());
    }

    #[test]
    fn set_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut store = ConfigStore::open(path.clone()).unwrap();
        store.set(config_keys::ENDPOINT, "http://127.0.0.1:1234/v1/chat/completions");
        store.save().unwrap();

        let reloaded = ConfigStore::open(path).unwrap();
        assert_eq!(
            reloaded.endpoint(),
            Some("http://127.0.0.1:1234/v1/chat/completions")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(ConfigStore::open(path).is_err());
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"endpoint": "http://localhost:1234", "theme": "dark"}"#).unwrap();

        let store = ConfigStore::open(path.clone()).unwrap();
        store.save().unwrap();

        let reloaded = ConfigStore::open(path).unwrap();
        assert_eq!(reloaded.get("theme"), Some("dark"));
    }
}
