use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Durable application configuration, stored as a flat JSON object.
///
/// `latest_directories` is ordered most-recent-first and never contains
/// `default_folder`. The file is re-read before every mutation, so the
/// on-disk document is always authoritative.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Archival directory every capture is written to
    pub default_folder: PathBuf,
    /// Previously used target directories, most recent first
    pub latest_directories: Vec<PathBuf>,
}

impl Config {
    /// Configuration written on first run: an empty history and an archive
    /// folder under the platform pictures directory.
    pub fn initial() -> Self {
        let base = dirs::picture_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
            .unwrap_or_else(|| PathBuf::from("."));

        Config {
            default_folder: base.join("shotbox"),
            latest_directories: Vec::new(),
        }
    }
}

/// Errors that can occur when loading or persisting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but does not parse. Fatal at startup: the
    /// application refuses to invent a default folder over damaged data.
    #[error("Configuration file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to encode the configuration document
    #[error("Failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),

    /// I/O error when reading or writing the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The configuration file on disk.
///
/// Every component that needs the config goes through this store; the
/// file is never opened inline anywhere else.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config location:
    /// - Linux: ~/.config/shotbox/config.json
    /// - macOS: ~/Library/Application Support/shotbox/config.json
    /// - Windows: %APPDATA%\shotbox\config.json
    pub fn at_default_location() -> Self {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user config directory");

        path.push("shotbox");
        path.push("config.json");
        Self::new(path)
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the config file.
    ///
    /// A malformed file is `ConfigError::Corrupt`, never replaced with
    /// defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let json = fs::read_to_string(&self.path)?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the config, writing `Config::initial()` first if the file does
    /// not exist yet. Only a missing file is initialized; a corrupt one
    /// still fails loudly.
    pub fn load_or_init(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            let config = Config::initial();
            self.save(&config)?;
            println!("📁 Wrote initial configuration to {}", self.path.display());
            return Ok(config);
        }

        self.load()
    }

    /// Persist the full configuration document.
    ///
    /// The new document is built in memory first and written with a single
    /// call, so readers never observe partial JSON.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        let config = Config {
            default_folder: PathBuf::from("/archive"),
            latest_directories: vec![PathBuf::from("/archive/proj"), PathBuf::from("/tmp/shots")],
        };

        store.save(&config).unwrap();
        let restored = store.load().unwrap();

        assert_eq!(config, restored);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        assert!(matches!(store.load(), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_corrupt_file_fails_loudly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ \"default_folder\": ").unwrap();

        let store = ConfigStore::new(&path);

        assert!(matches!(store.load(), Err(ConfigError::Corrupt { .. })));
        // load_or_init must not paper over a damaged file either
        assert!(matches!(store.load_or_init(), Err(ConfigError::Corrupt { .. })));
    }

    #[test]
    fn test_load_or_init_creates_file_once() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("config.json"));

        let first = store.load_or_init().unwrap();
        assert!(store.path().exists());
        assert!(first.latest_directories.is_empty());

        // A second call reads the same document back
        let second = store.load_or_init().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_save_is_whole_document() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        let mut config = Config {
            default_folder: PathBuf::from("/archive"),
            latest_directories: Vec::new(),
        };
        store.save(&config).unwrap();

        config.latest_directories.insert(0, PathBuf::from("/a"));
        store.save(&config).unwrap();

        let json = fs::read_to_string(store.path()).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
