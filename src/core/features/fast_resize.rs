//! Canonical-size resampling for feature extraction.
//!
//! Histograms are taken from an RGB thumbnail and keypoints from a
//! capped grayscale copy; both go through fast_image_resize, which picks
//! AVX2/NEON kernels at runtime.

use crate::error::FeatureError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage};

/// Reusable bilinear resizer
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    /// Create a new fast resizer
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Resize an image to the specified dimensions as 8-bit RGB.
    pub fn resize_to_rgb(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, FeatureError> {
        let rgb = image.to_rgb8();
        let (src_width, src_height) = rgb.dimensions();
        let pixels = self.resize_raw(
            rgb.into_raw(),
            (src_width, src_height),
            (width, height),
            PixelType::U8x3,
        )?;

        ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| FeatureError::ResizeError {
            reason: "Failed to create RGB result buffer".to_string(),
        })
    }

    /// Resize an image to the specified dimensions and convert to grayscale.
    pub fn resize_to_grayscale(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, FeatureError> {
        // Convert to grayscale first (faster than resizing RGB then converting)
        let gray = image.to_luma8();
        let (src_width, src_height) = gray.dimensions();
        let pixels = self.resize_raw(
            gray.into_raw(),
            (src_width, src_height),
            (width, height),
            PixelType::U8,
        )?;

        ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| FeatureError::ResizeError {
            reason: "Failed to create grayscale result buffer".to_string(),
        })
    }

    fn resize_raw(
        &mut self,
        pixels: Vec<u8>,
        (src_width, src_height): (u32, u32),
        (width, height): (u32, u32),
        pixel_type: PixelType,
    ) -> Result<Vec<u8>, FeatureError> {
        if src_width == 0 || src_height == 0 {
            return Err(FeatureError::ResizeError {
                reason: "Invalid source dimensions".to_string(),
            });
        }

        if width == 0 || height == 0 {
            return Err(FeatureError::ResizeError {
                reason: "Invalid destination dimensions".to_string(),
            });
        }

        let src_image = Image::from_vec_u8(src_width, src_height, pixels, pixel_type).map_err(
            |e| FeatureError::ResizeError {
                reason: format!("Failed to create source image: {}", e),
            },
        )?;

        let mut dst_image = Image::new(width, height, pixel_type);

        // Bilinear is a good balance of speed and quality for feature extraction
        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| FeatureError::ResizeError {
                reason: format!("Resize failed: {}", e),
            })?;

        Ok(dst_image.into_vec())
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function for one-off RGB resizing
pub fn resize_to_rgb(image: &DynamicImage, width: u32, height: u32) -> Result<RgbImage, FeatureError> {
    FastResizer::new().resize_to_rgb(image, width, height)
}

/// Convenience function for one-off grayscale resizing
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, FeatureError> {
    FastResizer::new().resize_to_grayscale(image, width, height)
}
