/// Capture pipeline module
///
/// This module handles:
/// - Grabbing images from the system clipboard (clipboard.rs)
/// - Turning a capture request into destination filenames (naming.rs)
/// - Writing the PNG files and recording path history (controller.rs)

pub mod clipboard;
pub mod controller;
pub mod naming;
