use chrono::{Local, NaiveDateTime};
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::clipboard::{ClipboardError, ImageSource};
use super::naming;
use crate::state::config::{ConfigError, ConfigStore};
use crate::state::gallery::IMAGE_SUFFIX;
use crate::state::history::PathHistory;

/// One save action: where to put it, what to call it, when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// User-chosen directory; empty means the default folder
    pub target: String,
    /// User-entered label; may be empty
    pub label: String,
    /// Stamped when the request is constructed
    pub timestamp: NaiveDateTime,
}

impl CaptureRequest {
    pub fn new(target: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            label: label.into(),
            timestamp: Local::now().naive_local(),
        }
    }
}

/// What a save attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Files were written and the target recorded in history
    Saved {
        /// Resolved target directory (the default folder when the
        /// request's target was empty)
        target: PathBuf,
        /// Archive copy under the default folder, written on every save
        long_path: PathBuf,
        /// Copy under the target directory; `None` when the target is
        /// the default folder
        short_path: Option<PathBuf>,
    },
    /// The clipboard held no image. Nothing was written and no history
    /// changed.
    NoImage,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write image {path}: {source}")]
    WriteImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Orchestrates a capture: clipboard grab, name computation, PNG writes,
/// history update.
///
/// Owns the image source. Configuration is read through the store on
/// every save, so external edits and other handles are always seen.
pub struct CaptureController<S: ImageSource> {
    store: ConfigStore,
    history: PathHistory,
    source: S,
}

impl<S: ImageSource> CaptureController<S> {
    pub fn new(store: ConfigStore, source: S) -> Self {
        let history = PathHistory::new(store.clone());
        Self {
            store,
            history,
            source,
        }
    }

    /// Save the clipboard image under the default folder and, when a
    /// distinct target was chosen, under the target as well.
    ///
    /// The clipboard is checked first: with no image there are no
    /// filesystem writes and no history mutation. Otherwise the target
    /// and default directories are created as needed, the archive copy
    /// is always written, the target copy only when the target differs
    /// from the default, and finally the target is recorded in history
    /// (idempotent, so repeated targets stay listed once).
    pub fn capture_and_save(
        &mut self,
        request: &CaptureRequest,
    ) -> Result<SaveOutcome, CaptureError> {
        let Some(image) = self.source.grab()? else {
            return Ok(SaveOutcome::NoImage);
        };

        let config = self.store.load()?;
        let target = resolve_target(&request.target, &config.default_folder);

        create_dir(&config.default_folder)?;
        create_dir(&target)?;

        let names = naming::build_names(
            &target,
            &config.default_folder,
            &request.label,
            request.timestamp,
        );

        let long_path = config.default_folder.join(png_file(&names.long_name));
        write_png(&image, &long_path)?;

        let short_path = match &names.short_name {
            Some(short) => {
                let path = target.join(png_file(short));
                write_png(&image, &path)?;
                Some(path)
            }
            None => None,
        };

        self.history.record_if_new(&target)?;

        Ok(SaveOutcome::Saved {
            target,
            long_path,
            short_path,
        })
    }
}

/// A trimmed, empty target means the default folder.
fn resolve_target(raw: &str, default_folder: &Path) -> PathBuf {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        default_folder.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}

fn png_file(name: &str) -> String {
    format!("{name}{IMAGE_SUFFIX}")
}

fn create_dir(path: &Path) -> Result<(), CaptureError> {
    fs::create_dir_all(path).map_err(|source| CaptureError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn write_png(image: &RgbaImage, path: &Path) -> Result<(), CaptureError> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| CaptureError::WriteImage {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::config::Config;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    struct StubSource(Option<RgbaImage>);

    impl ImageSource for StubSource {
        fn grab(&mut self) -> Result<Option<RgbaImage>, ClipboardError> {
            Ok(self.0.clone())
        }
    }

    fn test_image() -> RgbaImage {
        RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]))
    }

    fn request(target: &Path, label: &str) -> CaptureRequest {
        CaptureRequest {
            target: target.display().to_string(),
            label: label.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 2)
                .unwrap()
                .and_hms_opt(14, 5, 9)
                .unwrap(),
        }
    }

    fn controller_in(
        dir: &Path,
        image: Option<RgbaImage>,
    ) -> (CaptureController<StubSource>, PathHistory) {
        let store = ConfigStore::new(dir.join("config.json"));
        store
            .save(&Config {
                default_folder: dir.join("archive"),
                latest_directories: Vec::new(),
            })
            .unwrap();
        let history = PathHistory::new(store.clone());
        (CaptureController::new(store, StubSource(image)), history)
    }

    fn png_count(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
            .count()
    }

    #[test]
    fn test_no_image_has_no_side_effects() {
        let dir = tempdir().unwrap();
        let (mut controller, history) = controller_in(dir.path(), None);
        let target = dir.path().join("projects").join("shots");

        let outcome = controller
            .capture_and_save(&request(&target, "bug1"))
            .unwrap();

        assert_eq!(outcome, SaveOutcome::NoImage);
        assert!(!target.exists());
        assert!(!dir.path().join("archive").exists());
        assert!(history.list_paths().unwrap().is_empty());
    }

    #[test]
    fn test_save_on_default_folder_writes_one_file() {
        let dir = tempdir().unwrap();
        let (mut controller, history) = controller_in(dir.path(), Some(test_image()));

        let outcome = controller
            .capture_and_save(&CaptureRequest {
                target: String::new(),
                label: "bug1".to_string(),
                timestamp: NaiveDate::from_ymd_opt(2024, 3, 2)
                    .unwrap()
                    .and_hms_opt(14, 5, 9)
                    .unwrap(),
            })
            .unwrap();

        let archive = dir.path().join("archive");
        match outcome {
            SaveOutcome::Saved {
                target,
                long_path,
                short_path,
            } => {
                assert_eq!(target, archive);
                assert_eq!(long_path, archive.join("bug1___03_02_2024140509.png"));
                assert_eq!(short_path, None);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(png_count(&archive), 1);
        assert!(history.list_paths().unwrap().is_empty());
    }

    #[test]
    fn test_save_on_custom_target_writes_both_files_and_records_history() {
        let dir = tempdir().unwrap();
        let (mut controller, history) = controller_in(dir.path(), Some(test_image()));
        let target = dir.path().join("projects").join("shots");

        let outcome = controller
            .capture_and_save(&request(&target, "bug1"))
            .unwrap();

        let archive = dir.path().join("archive");
        match outcome {
            SaveOutcome::Saved { short_path, .. } => {
                assert_eq!(
                    short_path,
                    Some(target.join("bug1___03_02_2024140509.png"))
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(png_count(&archive), 1);
        assert_eq!(png_count(&target), 1);
        assert_eq!(history.list_paths().unwrap(), vec![target]);
    }

    #[test]
    fn test_repeated_saves_record_history_once_and_last_write_wins() {
        let dir = tempdir().unwrap();
        let (mut controller, history) = controller_in(dir.path(), Some(test_image()));
        let target = dir.path().join("projects").join("shots");

        controller
            .capture_and_save(&request(&target, "bug1"))
            .unwrap();
        controller
            .capture_and_save(&request(&target, "bug1"))
            .unwrap();

        // Identical inputs in the same second collide on the same name
        assert_eq!(png_count(&target), 1);
        assert_eq!(png_count(&dir.path().join("archive")), 1);
        assert_eq!(history.list_paths().unwrap(), vec![target]);
    }

    #[test]
    fn test_whitespace_target_means_default() {
        let dir = tempdir().unwrap();
        let (mut controller, _) = controller_in(dir.path(), Some(test_image()));

        let outcome = controller
            .capture_and_save(&CaptureRequest {
                target: "   ".to_string(),
                label: String::new(),
                timestamp: NaiveDate::from_ymd_opt(2024, 3, 2)
                    .unwrap()
                    .and_hms_opt(14, 5, 9)
                    .unwrap(),
            })
            .unwrap();

        match outcome {
            SaveOutcome::Saved {
                target, short_path, ..
            } => {
                assert_eq!(target, dir.path().join("archive"));
                assert_eq!(short_path, None);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
