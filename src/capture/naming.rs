use chrono::NaiveDateTime;
use std::path::{Component, Path};

/// Timestamp layout embedded in every saved filename: MM_DD_YYYYHHMMSS.
/// Fixed-width and zero-padded, with no separator between date and time.
pub const TIMESTAMP_FORMAT: &str = "%m_%d_%Y%H%M%S";

/// Joins the two directory segments inside the path fragment
const SEGMENT_SEPARATOR: &str = "__";

/// Joins the name components (path fragment, label, timestamp)
const COMPONENT_SEPARATOR: &str = "___";

/// The one or two filenames a capture is saved under, without suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedNamePair {
    /// Written to the default folder on every save
    pub long_name: String,
    /// Written to the target directory; `None` when the target is the
    /// default folder (or empty, which means the same thing)
    pub short_name: Option<String>,
}

/// Compute the destination filenames for one capture.
///
/// The long name carries the last two segments of the target path (so
/// archive copies stay distinguishable), then the label, then the
/// timestamp, joined by triple underscores. The short name drops the
/// path fragment: label and timestamp, or the timestamp alone. An empty
/// label and a default or empty target still produce a valid
/// timestamp-only name. Two captures within the same second with the
/// same inputs collide; the last write wins.
pub fn build_names(
    target: &Path,
    default_folder: &Path,
    label: &str,
    timestamp: NaiveDateTime,
) -> SavedNamePair {
    let stamp = timestamp.format(TIMESTAMP_FORMAT).to_string();
    let label = label.trim();

    let on_default = target.as_os_str().is_empty() || target == default_folder;
    let fragment = if on_default {
        String::new()
    } else {
        path_fragment(target)
    };

    let mut components: Vec<&str> = Vec::with_capacity(3);
    if !fragment.is_empty() {
        components.push(fragment.as_str());
    }
    if !label.is_empty() {
        components.push(label);
    }
    components.push(stamp.as_str());

    let long_name = components.join(COMPONENT_SEPARATOR);
    let short_name = (!on_default).then(|| {
        if label.is_empty() {
            stamp.clone()
        } else {
            format!("{label}{COMPONENT_SEPARATOR}{stamp}")
        }
    });

    SavedNamePair {
        long_name,
        short_name,
    }
}

/// Last two segments of `path`, joined by a double underscore.
fn path_fragment(path: &Path) -> String {
    let segments: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let tail = segments.len().saturating_sub(2);
    segments[tail..].join(SEGMENT_SEPARATOR)
}
