//! Tesseract engine implementation
//!
//! Tesseract-based recognition backend for the angle search. Uses the
//! tesseract-static crate for static linking (no system dependencies) and
//! downloads tessdata (training data) automatically on first use.

use crate::engine::{EngineProvider, Recognition, RecognitionEngine, SegmentationMode};
use crate::error::OrientError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tesseract_static::tesseract::Tesseract;

/// Provider of Tesseract recognition sessions.
///
/// Construction is the expensive part: it ensures the traineddata for the
/// requested language is present (downloading it into the cache directory if
/// not) and validates it with a throwaway initialization.
pub struct TesseractRecognizer {
    tessdata_path: String,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(language: &str, tessdata_path: Option<String>) -> Result<Self, OrientError> {
        let tessdata_path = match tessdata_path {
            Some(path) => path,
            None => ensure_tessdata_available(language)?,
        };

        // Validate that tessdata is usable before any detection run starts.
        let test_tess = Tesseract::new(Some(&tessdata_path), Some(language)).map_err(|e| {
            OrientError::EngineInit(format!("Failed to initialize Tesseract: {}", e))
        })?;
        drop(test_tess);

        tracing::info!(
            "Tesseract recognizer ready (tessdata: {}, language: {})",
            tessdata_path,
            language
        );

        Ok(Self {
            tessdata_path,
            language: language.to_string(),
        })
    }
}

impl EngineProvider for TesseractRecognizer {
    type Engine = TesseractSession;

    fn acquire(&self) -> Result<TesseractSession, OrientError> {
        Ok(TesseractSession {
            tessdata_path: self.tessdata_path.clone(),
            language: self.language.clone(),
        })
    }
}

/// One recognition session over validated tessdata.
pub struct TesseractSession {
    tessdata_path: String,
    language: String,
}

impl RecognitionEngine for TesseractSession {
    fn recognize(
        &mut self,
        image_path: &Path,
        mode: SegmentationMode,
    ) -> Result<Recognition, OrientError> {
        let img = image::open(image_path)
            .map_err(|e| OrientError::IoFailure(format!("Failed to load image: {}", e)))?;

        // Convert to RGB8 and re-encode as BMP in memory; BMP is always
        // supported by leptonica.
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut bmp_data = Vec::new();
        {
            let mut cursor = std::io::Cursor::new(&mut bmp_data);
            rgb_img
                .write_to(&mut cursor, image::ImageFormat::Bmp)
                .map_err(|e| {
                    OrientError::EngineFailure(format!("Failed to convert to BMP: {}", e))
                })?;
        }

        tracing::debug!(
            "Recognizing candidate: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let mut tess = Tesseract::new(Some(&self.tessdata_path), Some(&self.language))
            .map_err(|e| OrientError::EngineFailure(format!("Failed to create Tesseract: {}", e)))?;

        tess = tess
            .set_variable("tessedit_pageseg_mode", mode.psm_value())
            .map_err(|e| {
                OrientError::EngineFailure(format!("Failed to set segmentation mode: {}", e))
            })?;

        tess = tess.set_image_from_mem(&bmp_data).map_err(|e| {
            OrientError::EngineFailure(format!(
                "Failed to set image ({}x{}, {} bytes): {}",
                width,
                height,
                bmp_data.len(),
                e
            ))
        })?;

        tess = tess
            .recognize()
            .map_err(|e| OrientError::EngineFailure(format!("Failed to recognize text: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| OrientError::EngineFailure(format!("Failed to get text: {}", e)))?;

        // Tesseract reports confidence on a 0-100 scale.
        let mean_confidence = tess.mean_text_conf() as f32 / 100.0;

        Ok(Recognition {
            text,
            mean_confidence,
        })
    }
}

// ============================================================================
// Tessdata download helpers
// ============================================================================

/// Ensure tessdata is available, downloading if needed
fn ensure_tessdata_available(language: &str) -> Result<String, OrientError> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("textorient")
        .join("tessdata");

    std::fs::create_dir_all(&cache_dir).map_err(|e| {
        OrientError::EngineInit(format!("Failed to create tessdata directory: {}", e))
    })?;

    let traineddata_file = format!("{}.traineddata", language);
    let traineddata_path = cache_dir.join(&traineddata_file);

    if !traineddata_path.exists() {
        let url = tessdata_url(language);
        tracing::info!(
            "Downloading tessdata for '{}' (this may take a moment)...",
            language
        );
        download_file(&url, &traineddata_path)?;
        tracing::info!("Downloaded tessdata to {:?}", traineddata_path);
    } else {
        tracing::info!("Using cached tessdata from {:?}", cache_dir);
    }

    // Tesseract expects the directory, not the file.
    cache_dir
        .to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| OrientError::EngineInit("Invalid tessdata path".to_string()))
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    // tessdata_fast keeps the download small
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}

/// Download a file from URL to path using ureq
fn download_file(url: &str, path: &Path) -> Result<(), OrientError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| OrientError::EngineInit(format!("Failed to download tessdata: {}", e)))?;

    let mut file = File::create(path)
        .map_err(|e| OrientError::EngineInit(format!("Failed to create tessdata file: {}", e)))?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        OrientError::EngineInit(format!("Failed to read tessdata response: {}", e))
    })?;

    file.write_all(&buffer)
        .map_err(|e| OrientError::EngineInit(format!("Failed to write tessdata file: {}", e)))?;

    Ok(())
}
