use image::RgbaImage;
use thiserror::Error;

/// Where capture images come from.
///
/// The controller only sees this trait, so tests can substitute a stub
/// source and the real clipboard stays at the edge of the program.
pub trait ImageSource {
    /// The image currently held on the clipboard, if any.
    fn grab(&mut self) -> Result<Option<RgbaImage>, ClipboardError>;
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to access the clipboard: {0}")]
    Access(#[source] arboard::Error),

    /// The provider reported an image whose byte count does not match
    /// its dimensions
    #[error("Clipboard image data is malformed")]
    MalformedImage,
}

/// The system clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connect to the system clipboard.
    pub fn new() -> Result<Self, ClipboardError> {
        arboard::Clipboard::new()
            .map(|inner| Self { inner })
            .map_err(ClipboardError::Access)
    }
}

impl ImageSource for SystemClipboard {
    fn grab(&mut self) -> Result<Option<RgbaImage>, ClipboardError> {
        let data = match self.inner.get_image() {
            Ok(data) => data,
            // An empty or non-image clipboard is not an error, just
            // nothing to save
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => return Err(ClipboardError::Access(e)),
        };

        let (width, height) = (data.width as u32, data.height as u32);
        match RgbaImage::from_raw(width, height, data.bytes.into_owned()) {
            Some(image) => Ok(Some(image)),
            None => Err(ClipboardError::MalformedImage),
        }
    }
}
