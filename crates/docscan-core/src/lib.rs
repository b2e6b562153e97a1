//! Core library for identity document OCR.
//!
//! This crate provides:
//! - Image preprocessing ahead of OCR
//! - OCR adapters (Tesseract CLI, PaddleOCR via pure-onnx-ocr)
//! - Heuristic field extraction (name, document number, expiration date)
//! - Date validation with expiry checking

pub mod error;
pub mod models;
pub mod ocr;
pub mod document;

pub use error::{ConfigError, OcrError, ScanError};
pub use models::config::{DocscanConfig, OcrBackend, OcrConfig, ServerConfig};
pub use models::document::{DocumentFields, FieldKind};
pub use ocr::{create_engine, ImagePreprocessor, OcrEngine, TesseractEngine};
#[cfg(feature = "onnx")]
pub use ocr::PureOcrEngine;
pub use document::{DocumentScanner, FieldExtractor};
pub use document::rules::dates::{
    Clock, DateFormat, DateValidator, DateVerdict, FixedClock, SystemClock,
};
