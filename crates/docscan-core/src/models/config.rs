//! Configuration structures for the scanning service.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Main configuration for docscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocscanConfig {
    /// HTTP server configuration.
    pub server: ServerConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub bind_address: String,

    /// Port to listen on.
    pub port: u16,

    /// Include error details in 500 responses.
    pub debug: bool,

    /// Maximum accepted request body size in bytes.
    ///
    /// Unprocessed phone photos of ID cards often exceed 5 MiB, so the
    /// default allows 16 MiB. Larger requests get a 413.
    pub max_upload_bytes: usize,

    /// Accepted file extensions (lowercase, without the dot).
    pub allowed_extensions: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            debug: false,
            max_upload_bytes: 16 * 1024 * 1024,
            allowed_extensions: ["png", "jpg", "jpeg", "gif", "bmp", "tiff"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl ServerConfig {
    /// Whether a filename carries one of the accepted extensions.
    ///
    /// Only the part after the last `.` is considered, case-insensitively.
    pub fn is_allowed_file(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_lowercase();
                self.allowed_extensions.iter().any(|allowed| *allowed == ext)
            }
            None => false,
        }
    }
}

/// Which OCR engine to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    /// The `tesseract` command line tool.
    #[default]
    Tesseract,
    /// PaddleOCR ONNX models through pure-onnx-ocr.
    Onnx,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engine to use.
    pub backend: OcrBackend,

    /// Path or name of the tesseract binary.
    pub tesseract_path: String,

    /// Tesseract language code.
    pub language: String,

    /// Directory containing ONNX model files (det.onnx, latin_rec.onnx, latin_dict.txt).
    pub model_dir: PathBuf,

    /// Maximum image dimension (longer side) before downscaling.
    pub max_image_size: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackend::Tesseract,
            tesseract_path: "tesseract".to_string(),
            language: "eng".to_string(),
            model_dir: PathBuf::from("models"),
            max_image_size: 2000,
        }
    }
}

impl DocscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from `default_path` if it exists, else defaults.
    pub fn load(path: Option<&Path>, default_path: &Path) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if default_path.exists() => Self::from_file(default_path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "must be non-zero"));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(invalid("server.max_upload_bytes", "must be non-zero"));
        }
        if self.server.allowed_extensions.is_empty() {
            return Err(invalid("server.allowed_extensions", "must not be empty"));
        }
        if self.ocr.max_image_size == 0 {
            return Err(invalid("ocr.max_image_size", "must be non-zero"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
