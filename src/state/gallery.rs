use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// File suffix the gallery shows. The match is exact and case-sensitive:
/// `shot.PNG` is skipped just like any other non-matching file.
pub const IMAGE_SUFFIX: &str = ".png";

/// A single image in the currently browsed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    /// Full path to the PNG file
    pub file_path: PathBuf,
    /// Filename without the suffix, shown and edited in the gallery
    pub display_name: String,
}

#[derive(Debug, Error)]
pub enum GalleryError {
    /// Destination filename already in use; the original file is untouched
    #[error("A file named {} already exists here", .0.display())]
    Conflict(PathBuf),

    /// Empty names and names containing path separators are rejected
    /// before any filesystem call
    #[error("{0:?} is not a valid image name")]
    InvalidName(String),

    /// Directory listing or rename failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Enumerate the `.png` files of `dir`, newest first.
///
/// Non-matching files and directories are silently skipped. Ordering is
/// by file modification time, ties broken by reverse filename, so the
/// listing is total and deterministic rather than whatever order the OS
/// happens to return directory entries in.
pub fn list_entries(dir: &Path) -> Result<Vec<GalleryEntry>, GalleryError> {
    let listing = fs::read_dir(dir).map_err(|source| GalleryError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut dated: Vec<(SystemTime, GalleryEntry)> = Vec::new();

    for entry in listing {
        let entry = entry.map_err(|source| GalleryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        // Entries that vanish or turn unreadable mid-listing are skipped
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stem) = name.strip_suffix(IMAGE_SUFFIX) else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let display_name = stem.to_string();
        dated.push((
            modified,
            GalleryEntry {
                file_path: path,
                display_name,
            },
        ));
    }

    dated.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.display_name.cmp(&a.1.display_name))
    });

    Ok(dated.into_iter().map(|(_, entry)| entry).collect())
}

/// Rename a gallery entry on disk.
///
/// Only the filename component changes; the new name gets the `.png`
/// suffix appended. The destination is checked before the rename
/// commits, so a conflict leaves both files exactly as they were.
/// Renaming an entry to its current name is a no-op success.
pub fn rename_entry(entry: &GalleryEntry, new_name: &str) -> Result<GalleryEntry, GalleryError> {
    let new_name = new_name.trim();
    if new_name.is_empty() || new_name.contains(['/', '\\']) {
        return Err(GalleryError::InvalidName(new_name.to_string()));
    }
    if new_name == entry.display_name {
        return Ok(entry.clone());
    }

    let destination = entry
        .file_path
        .with_file_name(format!("{new_name}{IMAGE_SUFFIX}"));
    if destination.exists() {
        return Err(GalleryError::Conflict(destination));
    }

    fs::rename(&entry.file_path, &destination).map_err(|source| GalleryError::Io {
        path: entry.file_path.clone(),
        source,
    })?;

    Ok(GalleryEntry {
        file_path: destination,
        display_name: new_name.to_string(),
    })
}
