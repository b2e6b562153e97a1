//! Tesseract OCR engine (CLI wrapper).

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::OcrEngine;

/// OCR engine backed by the `tesseract` binary.
pub struct TesseractEngine {
    binary: String,
    language: String,
    version: String,
}

impl TesseractEngine {
    /// Create an engine, checking that the binary runs.
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let version = tesseract_version(&config.tesseract_path)?;
        info!("Using tesseract {} ({})", version, config.tesseract_path);

        Ok(Self {
            binary: config.tesseract_path.clone(),
            language: config.language.clone(),
            version,
        })
    }

    fn recognize_file(&self, path: &Path) -> Result<String, OcrError> {
        debug!(
            "Running {} {} stdout -l {}",
            self.binary,
            path.display(),
            self.language
        );

        let output = Command::new(&self.binary)
            .arg(path.as_os_str())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| {
                OcrError::EngineUnavailable(format!("failed to run {}: {}", self.binary, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "tesseract exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        let temp_dir = tempfile::tempdir().map_err(|e| {
            OcrError::Preprocessing(format!("failed to create temp dir: {}", e))
        })?;
        let input = temp_dir.path().join("document.png");

        image
            .save(&input)
            .map_err(|e| OcrError::Preprocessing(format!("failed to write temp image: {}", e)))?;

        let text = self.recognize_file(&input)?;

        info!(
            "OCR complete: {}x{} image, {} chars in {}ms",
            width,
            height,
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }

    fn describe(&self) -> String {
        format!("tesseract {} (lang {})", self.version, self.language)
    }
}

/// Query `tesseract --version`, returning the first line of its banner.
fn tesseract_version(binary: &str) -> Result<String, OcrError> {
    let output = Command::new(binary)
        .arg("--version")
        .output()
        .map_err(|e| {
            OcrError::EngineUnavailable(format!(
                "failed to run {} (is tesseract installed?): {}",
                binary, e
            ))
        })?;

    if !output.status.success() {
        return Err(OcrError::EngineUnavailable(format!(
            "{} --version exited with code {}",
            binary,
            output.status.code().unwrap_or(-1)
        )));
    }

    // Older releases print the banner on stderr.
    let banner = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };

    Ok(parse_version(&banner))
}

fn parse_version(banner: &str) -> String {
    let first = banner.lines().next().unwrap_or("").trim();
    first
        .strip_prefix("tesseract")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(
            parse_version("tesseract 5.3.0\n leptonica-1.82.0\n  libgif 5.2.1"),
            "5.3.0"
        );
        assert_eq!(parse_version("tesseract v4.1.1"), "v4.1.1");
        assert_eq!(parse_version(""), "unknown");
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let config = OcrConfig {
            tesseract_path: "/nonexistent/bin/tesseract-docscan".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            TesseractEngine::new(&config),
            Err(OcrError::EngineUnavailable(_))
        ));
    }
}
