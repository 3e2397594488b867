//! Application configuration.
//!
//! Settings for storage locations, remote sync, and the tracked guide
//! categories. Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::guides;

/// Configuration file name.
const CONFIG_FILE: &str = "ringside.toml";

/// Directory name under the platform config/data roots.
const APP_DIR: &str = "ringside";

/// Application configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // === Storage ===
    /// Directory for local progress files (None = platform data dir).
    pub data_dir: Option<PathBuf>,

    // === Sync ===
    /// Push progress to the remote tier when signed in.
    pub sync_enabled: bool,

    // === Guides ===
    /// Guide categories shown in the tracker.
    pub tracked_categories: Vec<String>,

    // === Display ===
    /// Number of entries in the top-rated roster list.
    pub top_list_size: usize,

    // === Advice ===
    /// Enable the matchup advice panel.
    pub advice_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            sync_enabled: true,
            tracked_categories: guides::ALL_KEYS.iter().map(ToString::to_string).collect(),
            top_list_size: 5,
            advice_enabled: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to the default file location.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(Self::config_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join(APP_DIR).join(CONFIG_FILE)
        } else {
            // Fall back to current directory
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// The directory local progress files live in.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map_or_else(|| PathBuf::from(APP_DIR), |base| base.join(APP_DIR))
    }

    /// Validate and clamp configuration values to sensible ranges.
    ///
    /// Unknown guide categories are dropped; an empty category list is
    /// reset to the full built-in set.
    pub fn validate(&mut self) {
        self.top_list_size = self.top_list_size.clamp(1, 50);

        self.tracked_categories.retain(|key| {
            let known = guides::ALL_KEYS.contains(&key.as_str());
            if !known {
                warn!("Dropping unknown guide category {key:?}");
            }
            known
        });
        self.tracked_categories.dedup();
        if self.tracked_categories.is_empty() {
            self.tracked_categories =
                guides::ALL_KEYS.iter().map(ToString::to_string).collect();
        }
    }
}
