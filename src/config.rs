use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub prompts: PromptConfig,
    pub history: HistoryConfig,
    pub sort: SortConfig,
}

/// Bookmark store configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON bookmark file; the data directory's `bookmarks.json` when unset
    pub path: Option<PathBuf>,
}

/// Confirmation prompts
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PromptConfig {
    /// Confirm before trashing the selection
    pub ask_before_delete: bool,
    /// Confirm again before removing a non-empty directory
    pub ask_before_directory_delete: bool,
}

/// Navigation history configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Navigations closer together than this collapse into one entry
    pub debounce_ms: u64,
    /// Bound of each pane's back stack
    pub capacity: usize,
}

/// Sort configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SortConfig {
    /// Rule list used by a plain sort, e.g. "name, link"
    pub rules: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        PromptConfig {
            ask_before_delete: true,
            ask_before_directory_delete: true,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            debounce_ms: 100,
            capacity: 32,
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig {
            rules: "name".to_string(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "commander")
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Where the saved navigation state lives
    pub fn state_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join("state.json"))
    }

    /// The configured bookmark file, or the default one in the data directory
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store
            .path
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("bookmarks.json")))
    }

    /// Load configuration from file, or return defaults if file doesn't exist
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                    log::warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file: {}", e);
                log::warn!("Using default configuration");
                Config::default()
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Err("Could not determine config directory".into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Create a default config file if it doesn't exist
    pub fn create_default() -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
        if let Some(path) = Self::config_path() {
            if !path.exists() {
                Config::default().save_to(&path)?;
            }
            return Ok(Some(path));
        }
        Ok(None)
    }
}
