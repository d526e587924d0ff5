use iced::widget::image::Handle;
use image::imageops::FilterType;
use std::path::Path;

/// Longest edge of a gallery thumbnail, in pixels
const THUMBNAIL_SIZE: u32 = 420;

/// Decode a saved PNG and downscale it for the gallery column.
///
/// Images already smaller than the thumbnail size are shown as-is.
pub fn load_thumbnail(path: &Path) -> Result<Handle, image::ImageError> {
    let img = image::open(path)?;

    let img = if img.width().max(img.height()) > THUMBNAIL_SIZE {
        img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Handle::from_rgba(width, height, rgba.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use tempfile::tempdir;

    #[test]
    fn test_load_thumbnail_decodes_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shot.png");
        RgbaImage::from_pixel(600, 40, image::Rgba([1, 2, 3, 255]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        assert!(load_thumbnail(&path).is_ok());
    }

    #[test]
    fn test_load_thumbnail_rejects_non_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"plain text").unwrap();

        assert!(load_thumbnail(&path).is_err());
    }
}
