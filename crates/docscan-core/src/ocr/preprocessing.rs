//! Image preprocessing for OCR.

use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::OcrError;

/// Image preprocessor for the OCR pipeline.
///
/// Normalizes images to 8-bit RGB and downsamples anything whose longer side
/// exceeds `max_size`.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    /// Maximum image dimension.
    max_size: u32,
}

impl ImagePreprocessor {
    /// Default longer-side limit.
    pub const DEFAULT_MAX_SIZE: u32 = 2000;

    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self {
            max_size: Self::DEFAULT_MAX_SIZE,
        }
    }

    /// Set maximum image dimension.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = size;
        self
    }

    /// Prepare an image for OCR.
    pub fn prepare(&self, image: DynamicImage) -> Result<DynamicImage, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "image has zero dimension ({}x{})",
                width, height
            )));
        }

        let image = match image {
            rgb @ DynamicImage::ImageRgb8(_) => rgb,
            other => {
                debug!("Converting {:?} image to RGB8", other.color());
                DynamicImage::ImageRgb8(other.to_rgb8())
            }
        };

        let (new_width, new_height) = self.calculate_resize_dimensions(width, height);
        if (new_width, new_height) == (width, height) {
            return Ok(image);
        }

        debug!(
            "Resizing image from {}x{} to {}x{}",
            width, height, new_width, new_height
        );

        Ok(image.resize_exact(
            new_width,
            new_height,
            image::imageops::FilterType::Lanczos3,
        ))
    }

    fn calculate_resize_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let max_dim = width.max(height);

        if max_dim <= self.max_size {
            return (width, height);
        }

        // Integer math keeps the longer side exact and equal sides equal.
        let scaled =
            |side: u32| ((side as u64 * self.max_size as u64 / max_dim as u64) as u32).max(1);

        (scaled(width), scaled(height))
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};

    #[test]
    fn test_resize_dimensions() {
        let preprocessor = ImagePreprocessor::new();

        // Image smaller than target
        assert_eq!(preprocessor.calculate_resize_dimensions(500, 300), (500, 300));
        assert_eq!(preprocessor.calculate_resize_dimensions(2000, 1000), (2000, 1000));

        // Image larger than target
        assert_eq!(preprocessor.calculate_resize_dimensions(4000, 3000), (2000, 1500));
        assert_eq!(preprocessor.calculate_resize_dimensions(1000, 3001), (666, 2000));
        assert_eq!(preprocessor.calculate_resize_dimensions(3001, 3001), (2000, 2000));
    }

    #[test]
    fn test_square_images_stay_square() {
        let preprocessor = ImagePreprocessor::new();

        for side in [2001, 3001, 4096, 12_345] {
            assert_eq!(
                preprocessor.calculate_resize_dimensions(side, side),
                (2000, 2000),
                "{}x{}",
                side,
                side
            );
        }
    }

    #[test]
    fn test_extreme_aspect_ratio_keeps_one_pixel() {
        let preprocessor = ImagePreprocessor::new().with_max_size(100);
        assert_eq!(preprocessor.calculate_resize_dimensions(10_000, 1), (100, 1));
    }

    #[test]
    fn test_small_image_keeps_size_and_becomes_rgb() {
        let preprocessor = ImagePreprocessor::new();
        let image = DynamicImage::ImageLuma8(GrayImage::new(640, 480));

        let prepared = preprocessor.prepare(image).unwrap();

        assert_eq!(prepared.dimensions(), (640, 480));
        assert!(matches!(prepared, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_rgba_is_converted() {
        let preprocessor = ImagePreprocessor::new();
        let image = DynamicImage::ImageRgba8(RgbaImage::new(32, 16));

        let prepared = preprocessor.prepare(image).unwrap();

        assert!(matches!(prepared, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let preprocessor = ImagePreprocessor::new().with_max_size(200);
        let image = DynamicImage::ImageRgb8(RgbImage::new(300, 450));

        let prepared = preprocessor.prepare(image).unwrap();

        let (w, h) = prepared.dimensions();
        assert_eq!(h, 200);
        let original_ratio = 300.0 / 450.0;
        let ratio = w as f64 / h as f64;
        assert!((ratio - original_ratio).abs() < 0.01);
    }

    #[test]
    fn test_zero_sized_image_is_rejected() {
        let preprocessor = ImagePreprocessor::new();
        let image = DynamicImage::ImageRgb8(RgbImage::new(0, 10));

        assert!(matches!(
            preprocessor.prepare(image),
            Err(OcrError::InvalidImage(_))
        ));
    }
}
