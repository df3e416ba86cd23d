//! farmgate configuration.
//!
//! Loaded from `~/.farmgate/config.toml`. Every key is optional; a missing
//! file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::SqliteStore;

/// farmgate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// The default acting user, used when neither `--as` nor
    /// `FARMGATE_USER` is set.
    pub user: Option<String>,

    /// Path to the offer database.
    /// Defaults to `~/.farmgate/offers.sqlite`.
    pub database: Option<PathBuf>,
}

impl Config {
    /// Load config from `~/.farmgate/config.toml`, or defaults if it doesn't exist.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.farmgate/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".farmgate").join("config.toml"))
    }

    /// Where the offer database lives.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.clone().or_else(SqliteStore::default_path)
    }
}
