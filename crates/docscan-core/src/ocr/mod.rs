//! OCR adapters and image preprocessing.

mod preprocessing;
#[cfg(feature = "onnx")]
mod pure_engine;
mod tesseract;

pub use preprocessing::ImagePreprocessor;
#[cfg(feature = "onnx")]
pub use pure_engine::PureOcrEngine;
pub use tesseract::TesseractEngine;

use image::DynamicImage;

use crate::error::OcrError;
use crate::models::config::{OcrBackend, OcrConfig};

/// An engine that turns an image into text.
///
/// Implementations must keep line breaks between recognized lines; the field
/// extractor scans the output line by line.
pub trait OcrEngine: Send + Sync {
    /// Recognize all text in the image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;

    /// Human readable engine name and version.
    fn describe(&self) -> String;
}

/// Build the engine selected in the configuration.
pub fn create_engine(config: &OcrConfig) -> Result<Box<dyn OcrEngine>, OcrError> {
    match config.backend {
        OcrBackend::Tesseract => Ok(Box::new(TesseractEngine::new(config)?)),
        #[cfg(feature = "onnx")]
        OcrBackend::Onnx => Ok(Box::new(PureOcrEngine::from_dir(&config.model_dir)?)),
        #[cfg(not(feature = "onnx"))]
        OcrBackend::Onnx => Err(OcrError::EngineUnavailable(
            "built without the `onnx` feature".to_string(),
        )),
    }
}
