//! Full pipeline: decode, preprocess, recognize, extract.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::{OcrError, ScanError};
use crate::models::config::OcrConfig;
use crate::models::document::DocumentFields;
use crate::ocr::{create_engine, ImagePreprocessor, OcrEngine};

use super::FieldExtractor;

/// Turns document images into extracted fields.
///
/// Built once at startup and shared; holds no per-request state.
pub struct DocumentScanner {
    preprocessor: ImagePreprocessor,
    engine: Box<dyn OcrEngine>,
    extractor: FieldExtractor,
}

impl DocumentScanner {
    /// Create a scanner around an OCR engine with default preprocessing and extraction.
    pub fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self {
            preprocessor: ImagePreprocessor::new(),
            engine,
            extractor: FieldExtractor::new(),
        }
    }

    /// Create a scanner with the engine and limits from the configuration.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let engine = create_engine(config)?;
        Ok(Self::new(engine)
            .with_preprocessor(ImagePreprocessor::new().with_max_size(config.max_image_size)))
    }

    /// Set the preprocessor.
    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Set the field extractor.
    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Description of the OCR engine in use.
    pub fn engine_description(&self) -> String {
        self.engine.describe()
    }

    /// Scan an encoded image (PNG, JPEG, GIF, BMP, TIFF, ...).
    pub fn scan_bytes(&self, bytes: &[u8]) -> Result<DocumentFields, ScanError> {
        let image = image::load_from_memory(bytes).map_err(ScanError::InvalidImage)?;
        self.scan_image(image)
    }

    /// Scan an image file on disk.
    pub fn scan_path(&self, path: &Path) -> Result<DocumentFields, ScanError> {
        let bytes = std::fs::read(path)?;
        self.scan_bytes(&bytes)
    }

    /// Scan a decoded image.
    pub fn scan_image(&self, image: DynamicImage) -> Result<DocumentFields, ScanError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        let prepared = self.preprocessor.prepare(image)?;

        debug!("Starting OCR processing");
        let text = self.engine.recognize(&prepared)?;
        debug!("Extracted text: {}", text);

        let fields = self.extractor.extract(&text);

        info!(
            "Scanned {}x{} document: {} of 3 fields in {}ms",
            width,
            height,
            fields.populated_count(),
            start.elapsed().as_millis()
        );

        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use image::{ImageFormat, RgbImage, RgbaImage};
    use pretty_assertions::assert_eq;

    use crate::document::rules::{DateValidator, FixedClock};

    /// Returns canned text and records the size of what it was given.
    struct CannedEngine {
        text: String,
        seen: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl OcrEngine for CannedEngine {
        fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
            self.seen.lock().unwrap().push(image.dimensions());
            Ok(self.text.clone())
        }

        fn describe(&self) -> String {
            "canned".to_string()
        }
    }

    struct BrokenEngine;

    impl OcrEngine for BrokenEngine {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            Err(OcrError::Recognition("engine crashed".to_string()))
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    fn scanner(text: &str) -> (DocumentScanner, Arc<Mutex<Vec<(u32, u32)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let engine = CannedEngine {
            text: text.to_string(),
            seen: Arc::clone(&seen),
        };
        let now = NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(0, 0, 1)
            .unwrap();
        let extractor = FieldExtractor::new()
            .with_date_validator(DateValidator::with_clock(Arc::new(FixedClock(now))));

        (DocumentScanner::new(Box::new(engine)).with_extractor(extractor), seen)
    }

    #[test]
    fn test_scan_bytes() {
        let (scanner, _) = scanner("PASSPORT\nSURNAME: DOE\nPASSPORT NO: X1234567\nVALID THRU: 01/02/2030");
        let bytes = png_bytes(DynamicImage::ImageRgba8(RgbaImage::new(64, 48)));

        let fields = scanner.scan_bytes(&bytes).unwrap();

        assert_eq!(
            fields,
            DocumentFields {
                name: Some("DOE".to_string()),
                document_number: Some("X1234567".to_string()),
                expiration_date: Some("01/02/2030".to_string()),
            }
        );
    }

    #[test]
    fn test_large_image_is_downscaled_before_ocr() {
        let (scanner, seen) = scanner("");
        let scanner = scanner.with_preprocessor(ImagePreprocessor::new().with_max_size(100));

        scanner
            .scan_image(DynamicImage::ImageRgb8(RgbImage::new(400, 200)))
            .unwrap();

        assert_eq!(seen.lock().unwrap().as_slice(), &[(100, 50)]);
    }

    #[test]
    fn test_corrupt_bytes_are_invalid_input() {
        let (scanner, seen) = scanner("NAME: NEVER");

        let err = scanner.scan_bytes(b"definitely not an image").unwrap_err();

        assert!(err.is_invalid_input());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_engine_failure_propagates() {
        let scanner = DocumentScanner::new(Box::new(BrokenEngine));
        let bytes = png_bytes(DynamicImage::ImageRgb8(RgbImage::new(8, 8)));

        let err = scanner.scan_bytes(&bytes).unwrap_err();

        assert!(matches!(err, ScanError::Ocr(OcrError::Recognition(_))));
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_missing_file() {
        let (scanner, _) = scanner("");
        let err = scanner
            .scan_path(Path::new("/nonexistent/docscan/scan.png"))
            .unwrap_err();

        assert!(matches!(err, ScanError::Io(_)));
    }
}
