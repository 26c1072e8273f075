//! Image file access shared by preview decoding and catalog checks.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat, ImageReader};

/// Decodes a photo file. Animated GIFs yield their first frame.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let format = image::guess_format(&bytes)
        .with_context(|| format!("Unrecognized image format: {:?}", path))?;

    let decoded = match format {
        ImageFormat::Gif => first_gif_frame(bytes),
        format => image::load_from_memory_with_format(&bytes, format).map_err(Into::into),
    };
    decoded.with_context(|| format!("Failed to decode image: {:?}", path))
}

fn first_gif_frame(bytes: Vec<u8>) -> Result<DynamicImage> {
    let frame = GifDecoder::new(Cursor::new(bytes))?
        .into_frames()
        .next()
        .context("GIF has no frames")??;
    Ok(DynamicImage::ImageRgba8(frame.into_buffer()))
}

/// Reads pixel dimensions from the image header without decoding pixels.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    let reader = ImageReader::open(path)
        .with_context(|| format!("Failed to open image: {:?}", path))?
        .with_guessed_format()
        .context("Failed to guess image format")?;
    reader
        .into_dimensions()
        .with_context(|| format!("Failed to read dimensions: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn test_read_dimensions_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(32, 20, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        assert_eq!(read_dimensions(&path).unwrap(), (32, 20));
        let img = open_image(&path).unwrap();
        assert_eq!((img.width(), img.height()), (32, 20));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(read_dimensions(Path::new("/nonexistent/photo.jpg")).is_err());
        assert!(open_image(Path::new("/nonexistent/photo.jpg")).is_err());
    }

    #[test]
    fn test_garbage_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not a real jpeg file").unwrap();
        assert!(open_image(&path).is_err());
    }
}
