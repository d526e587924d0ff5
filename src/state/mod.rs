/// State management module
///
/// This module handles all durable and derived application state:
/// - The JSON configuration file (config.rs)
/// - Recently used target directories (history.rs)
/// - The gallery listing and rename operations (gallery.rs)

pub mod config;
pub mod gallery;
pub mod history;
