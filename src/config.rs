//! Settings persistence.
//!
//! One JSON file holds everything an installation configures: the
//! watched folder, the archive roots, the registry location and the
//! pipeline cadence. A missing file means defaults; a malformed file is
//! an error, not a silent reset.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lifecycle::destination::DestinationMap;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "DOCKET_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Folder the watcher monitors, non-recursively.
    pub watch_dir: PathBuf,
    /// Plain text customer list, one name per line.
    pub registry_file: PathBuf,
    pub destinations: DestinationMap,
    /// Seconds between drain passes over the intake queue.
    pub drain_interval_secs: u64,
    /// Seconds the watcher lets a burst of events settle.
    pub debounce_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watch_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            registry_file: default_config_dir().join("customers.txt"),
            destinations: DestinationMap::default(),
            drain_interval_secs: 1,
            debounce_secs: 1,
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docket")
}

/// Path of the active config file: `$DOCKET_CONFIG` when set, otherwise
/// `config.json` under the per-user config dir.
pub fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    default_config_dir().join("config.json")
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("[config] {} missing, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Atomically persist: temp file, flush, sync, rename.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let temp_path = path.with_extension("tmp");
        let file = File::create(&temp_path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| write_err(e.into()))?;
        writer.flush().map_err(write_err)?;
        writer.get_ref().sync_all().map_err(write_err)?;

        fs::rename(&temp_path, path).map_err(write_err)?;
        Ok(())
    }

    pub fn drain_interval(&self) -> Duration {
        Duration::from_secs(self.drain_interval_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }
}
