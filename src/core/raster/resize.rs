//! SIMD-accelerated square resizing.
//!
//! Uses the fast_image_resize crate, which picks AVX2/NEON when available.
//! Every resize goes through the same bilinear convolution so both sides
//! of a comparison carry identical resampling artifacts.

use super::RasterImage;
use crate::error::RasterError;
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;

/// Reusable resizer; one per unit of work
pub struct FastResizer {
    resizer: Resizer,
    options: ResizeOptions,
}

impl FastResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            options: ResizeOptions::new()
                .resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        }
    }

    /// Resize to exactly `side × side`, ignoring the source aspect ratio.
    pub fn resize_square(
        &mut self,
        image: &RasterImage,
        side: u32,
    ) -> Result<RasterImage, RasterError> {
        if side == 0 {
            return Err(RasterError::Resize {
                resolution: side,
                reason: "Invalid destination dimensions".to_string(),
            });
        }

        if image.is_empty() {
            return Err(RasterError::Resize {
                resolution: side,
                reason: "Invalid source dimensions".to_string(),
            });
        }

        // borrowed view; the source buffer is never copied
        let src_image = ImageRef::new(
            image.width(),
            image.height(),
            image.as_raw(),
            PixelType::U8x3,
        )
        .map_err(|e| RasterError::Resize {
            resolution: side,
            reason: format!("Failed to create source image: {}", e),
        })?;

        let mut dst_image = Image::new(side, side, PixelType::U8x3);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .map_err(|e| RasterError::Resize {
                resolution: side,
                reason: e.to_string(),
            })?;

        let buffer = RgbImage::from_raw(side, side, dst_image.into_vec()).ok_or_else(|| {
            RasterError::Resize {
                resolution: side,
                reason: "Failed to create result buffer".to_string(),
            }
        })?;

        Ok(RasterImage::from_rgb(buffer))
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}
