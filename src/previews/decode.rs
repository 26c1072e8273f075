//! Preview decoding using the image crate.

use std::path::Path;

use anyhow::Result;
use image::imageops::FilterType;
use image::GenericImageView;
use tracing::debug;

use super::cache::Preview;
use crate::image_loader::open_image;

/// Scales `(width, height)` down so the longest edge is at most `max_edge`.
///
/// Images already inside the bound keep their size; neither edge drops below 1.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge || longest == 0 {
        return (width, height);
    }
    let scale = max_edge as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Decodes `path` into an RGBA preview no larger than `max_edge`.
pub fn decode_preview(path: &Path, max_edge: u32) -> Result<Preview> {
    let img = open_image(path)?;
    let (src_width, src_height) = img.dimensions();
    let (width, height) = fit_within(src_width, src_height, max_edge);

    let img = if (width, height) == (src_width, src_height) {
        img
    } else {
        // CatmullRom provides good quality/speed balance for downscaling
        img.resize_exact(width, height, FilterType::CatmullRom)
    };

    debug!(?path, src_width, src_height, width, height, "Decoded preview");
    Ok(Preview::new(width, height, img.into_rgba8().into_raw()))
}
