//! # Raster Module
//!
//! Decoded RGB pixel grids and the two operations the matcher needs on
//! them: loading from disk and resizing to a square side.
//!
//! ## Performance Optimizations
//! - Uses `zune-jpeg` for 1.5-2x faster JPEG decoding
//! - Uses `fast_image_resize` for SIMD-accelerated resizing
//!
//! Alpha is discarded at decode time; only R, G and B take part in
//! comparisons.

mod decode;
mod resize;

pub use decode::FastDecoder;
pub use resize::FastResizer;

use crate::error::RasterError;
use image::{DynamicImage, RgbImage};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RASTER_ID: AtomicU64 = AtomicU64::new(0);

/// A decoded image as an owned RGB pixel grid.
///
/// Pixels are immutable once constructed, so a clone keeps its id.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: RgbImage,
    id: u64,
}

impl RasterImage {
    /// Wrap an existing RGB buffer
    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self {
            pixels,
            id: NEXT_RASTER_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Convert any decoded image, dropping alpha
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::from_rgb(image.into_rgb8())
    }

    /// Identifies this pixel content for caches
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// Decode an image file
    pub fn open(path: &Path) -> Result<Self, RasterError> {
        FastDecoder::decode(path)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `[r, g, b]` at the given coordinate
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn red(&self, x: u32, y: u32) -> u8 {
        self.rgb(x, y)[0]
    }

    pub fn green(&self, x: u32, y: u32) -> u8 {
        self.rgb(x, y)[1]
    }

    pub fn blue(&self, x: u32, y: u32) -> u8 {
        self.rgb(x, y)[2]
    }

    /// Interleaved RGB bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    #[test]
    fn channel_accessors_read_pixel() {
        let raster = RasterImage::from_rgb(RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])));
        assert_eq!(raster.red(1, 1), 10);
        assert_eq!(raster.green(1, 1), 20);
        assert_eq!(raster.blue(1, 1), 30);
        assert_eq!(raster.rgb(0, 0), [10, 20, 30]);
    }

    #[test]
    fn alpha_is_discarded() {
        let rgba = RgbaImage::from_pixel(3, 1, Rgba([1, 2, 3, 0]));
        let raster = RasterImage::from_dynamic(DynamicImage::ImageRgba8(rgba));
        assert_eq!(raster.as_raw().len(), 9);
        assert_eq!(raster.rgb(2, 0), [1, 2, 3]);
    }

    #[test]
    fn clones_share_an_id_and_new_rasters_do_not() {
        let a = RasterImage::from_rgb(RgbImage::new(1, 1));
        let b = RasterImage::from_rgb(RgbImage::new(1, 1));
        assert_eq!(a.id(), a.clone().id());
        assert_ne!(a.id(), b.id());
    }
}
