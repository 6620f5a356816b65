use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::Catalog;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Template title to open on launch instead of the menu.
    #[serde(default)]
    pub start_template: Option<String>,
    #[serde(default = "default_show_keypad_hints")]
    pub show_keypad_hints: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_show_keypad_hints() -> bool {
    true
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quicklearn")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            start_template: None,
            show_keypad_hints: default_show_keypad_hints(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quicklearn")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Drop a `start_template` that no longer names a catalog entry.
    /// Call after deserialization; titles may be renamed between releases.
    pub fn normalize_start_template(&mut self, catalog: &Catalog) {
        let Some(title) = &self.start_template else {
            return;
        };
        if catalog.find(title).is_none() {
            warn!(title, "start_template is not in the catalog, ignoring");
            self.start_template = None;
        }
    }
}
