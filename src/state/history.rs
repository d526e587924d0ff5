use std::path::{Path, PathBuf};

use super::config::{ConfigError, ConfigStore};

/// Recently used target directories, backed by the config store.
///
/// This is a read-mostly view: every call re-reads durable storage, so
/// there is no staleness across calls or restarts, at the cost of one
/// read per call.
#[derive(Debug, Clone)]
pub struct PathHistory {
    store: ConfigStore,
}

impl PathHistory {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Record `path` as the most recently used directory.
    ///
    /// A no-op when `path` is the default folder or already present, so
    /// the history never contains duplicates or the default folder.
    /// Otherwise the path is prepended and the full config is written
    /// back in one read-modify-write sequence.
    pub fn record_if_new(&self, path: &Path) -> Result<(), ConfigError> {
        let mut config = self.store.load()?;

        if config.default_folder.as_path() == path {
            return Ok(());
        }
        if config.latest_directories.iter().any(|p| p.as_path() == path) {
            return Ok(());
        }

        config.latest_directories.insert(0, path.to_path_buf());
        self.store.save(&config)
    }

    /// The recorded directories, most recent first, re-read from disk.
    pub fn list_paths(&self) -> Result<Vec<PathBuf>, ConfigError> {
        Ok(self.store.load()?.latest_directories)
    }

    /// What the path picker offers: the default folder first, then the
    /// recent directories.
    pub fn choices(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let config = self.store.load()?;
        let mut choices = Vec::with_capacity(config.latest_directories.len() + 1);
        choices.push(config.default_folder);
        choices.extend(config.latest_directories);
        Ok(choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::config::Config;
    use tempfile::tempdir;

    fn history_in(dir: &Path) -> PathHistory {
        let store = ConfigStore::new(dir.join("config.json"));
        store
            .save(&Config {
                default_folder: dir.join("archive"),
                latest_directories: Vec::new(),
            })
            .unwrap();
        PathHistory::new(store)
    }

    #[test]
    fn test_record_if_new_is_idempotent() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path());
        let path = dir.path().join("projects").join("shots");

        history.record_if_new(&path).unwrap();
        history.record_if_new(&path).unwrap();

        assert_eq!(history.list_paths().unwrap(), vec![path]);
    }

    #[test]
    fn test_default_folder_is_never_recorded() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path());

        history.record_if_new(&dir.path().join("archive")).unwrap();

        assert!(history.list_paths().unwrap().is_empty());
    }

    #[test]
    fn test_most_recent_first_ordering() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path());
        let older = dir.path().join("older");
        let newer = dir.path().join("newer");

        history.record_if_new(&older).unwrap();
        history.record_if_new(&newer).unwrap();

        assert_eq!(history.list_paths().unwrap(), vec![newer, older]);
    }

    #[test]
    fn test_choices_lead_with_default_folder() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path());
        let recent = dir.path().join("recent");

        history.record_if_new(&recent).unwrap();

        assert_eq!(
            history.choices().unwrap(),
            vec![dir.path().join("archive"), recent]
        );
    }

    #[test]
    fn test_list_paths_rereads_durable_storage() {
        let dir = tempdir().unwrap();
        let history = history_in(dir.path());
        let store = ConfigStore::new(dir.path().join("config.json"));

        // Another handle mutates the file between calls
        store
            .save(&Config {
                default_folder: dir.path().join("archive"),
                latest_directories: vec![dir.path().join("external")],
            })
            .unwrap();

        assert_eq!(
            history.list_paths().unwrap(),
            vec![dir.path().join("external")]
        );
    }
}
