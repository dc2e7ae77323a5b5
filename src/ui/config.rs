//! # Configuration Persistence
//!
//! Manages user configuration stored in `~/.config/focus-tab/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's XDG config directory. It holds the theme, startup behaviour,
//! the remote endpoints, and a small string map of durable preferences. The
//! only preference written at runtime is the selected search engine.
//!
//! ## File Location
//!
//! ```text
//! ~/.config/focus-tab/config.json
//! ```
//!
//! The `directories` crate is used to resolve the platform-appropriate config
//! directory.
//!
//! ## Preference access
//!
//! Components never touch the file directly. They receive a
//! [`PreferenceStore`], read once at startup and written on each explicit
//! change. [`ConfigStore`] backs it with the config file, [`MemoryStore`] keeps
//! it in memory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Preference key holding the selected search engine id.
pub const ENGINE_PREFERENCE_KEY: &str = "search_engine";

/// Remote services consumed by the start page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoints {
    /// Quote service (hitokoto-compatible JSON).
    #[serde(default = "default_quote_endpoint")]
    pub quote: String,
    /// Suggestion service; `{query}` is replaced by the encoded query.
    #[serde(default = "default_suggestion_endpoint")]
    pub suggestion: String,
    /// Random image service; a millisecond timestamp is appended.
    #[serde(default = "default_wallpaper_endpoint")]
    pub wallpaper: String,
}

fn default_quote_endpoint() -> String {
    "https://v1.hitokoto.cn/?c=d&c=i&c=k".to_string()
}

fn default_suggestion_endpoint() -> String {
    "https://suggestion.baidu.com/su?ie=utf-8&wd={query}".to_string()
}

fn default_wallpaper_endpoint() -> String {
    "https://picsum.photos/1920/1080?random=".to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            quote: default_quote_endpoint(),
            suggestion: default_suggestion_endpoint(),
            wallpaper: default_wallpaper_endpoint(),
        }
    }
}

/// Persisted user configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The name of the selected theme (must match a built-in theme name).
    #[serde(default = "default_theme_name")]
    pub theme: String,
    /// Open with the search box active instead of the quote orb.
    #[serde(default = "default_start_focused")]
    pub start_focused: bool,
    /// Minimum seconds between quote rotations.
    #[serde(default = "default_quote_refresh_secs")]
    pub quote_refresh_secs: u64,
    #[serde(default)]
    pub endpoints: Endpoints,
    /// Durable key/value preferences.
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

fn default_start_focused() -> bool {
    true
}

fn default_quote_refresh_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            start_focused: default_start_focused(),
            quote_refresh_secs: default_quote_refresh_secs(),
            endpoints: Endpoints::default(),
            preferences: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Return the default path to the config file.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "focus-tab")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}

/// Read-at-startup, write-on-change access to durable preferences.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept in the config file.
///
/// Each `set` re-reads the file before writing so edits made to other fields
/// while the app runs are not clobbered.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    preferences: BTreeMap<String, String>,
}

impl ConfigStore {
    pub fn new(path: PathBuf, config: &Config) -> Self {
        Self {
            path,
            preferences: config.preferences.clone(),
        }
    }
}

impl PreferenceStore for ConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.preferences.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.preferences.insert(key.to_string(), value.to_string());
        let mut on_disk = Config::load_from(&self.path)?;
        on_disk
            .preferences
            .insert(key.to_string(), value.to_string());
        on_disk.save_to(&self.path)
    }
}

/// Preferences that live only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
