//! Error types for the docscan-core library.

use thiserror::Error;

/// Errors raised while turning an uploaded document into fields.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The bytes could not be decoded as an image.
    #[error("invalid image: {0}")]
    InvalidImage(#[source] image::ImageError),

    /// Preprocessing or recognition failed.
    #[error(transparent)]
    Ocr(#[from] OcrError),

    /// Failed to read the document from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Whether the failure is the caller's fault (bad input) rather than ours.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ScanError::InvalidImage(_))
    }
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine could not be started or found.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to loading and validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for our schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its accepted range.
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
