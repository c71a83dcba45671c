//! Capture cleanup applied before orientation detection.
//!
//! Upscales the capture, converts to grayscale, and applies a global binary
//! threshold. Cleaner input sharpens the per-angle confidence signal the
//! search relies on.

use crate::config::PreprocessOptions;
use crate::error::OrientError;
use image::{imageops::FilterType, DynamicImage, GenericImageView};
use imageproc::contrast::{threshold, ThresholdType};
use std::path::{Path, PathBuf};

pub fn apply(image: DynamicImage, opts: &PreprocessOptions) -> DynamicImage {
    let (width, height) = image.dimensions();
    let new_width = ((width as f32 * opts.resize_factor) as u32).max(1);
    let new_height = ((height as f32 * opts.resize_factor) as u32).max(1);

    let resized = if (new_width, new_height) == (width, height) {
        image
    } else {
        image.resize_exact(new_width, new_height, FilterType::Lanczos3)
    };

    let gray = resized.to_luma8();
    let thresh = (opts.threshold.clamp(0.0, 1.0) * 255.0) as u8;
    DynamicImage::ImageLuma8(threshold(&gray, thresh, ThresholdType::Binary))
}

/// Clean up the image at `input_path` and write the result next to it as
/// `preprocessed_<name>`. Returns the new path.
pub fn preprocess_file(
    input_path: &Path,
    opts: &PreprocessOptions,
) -> Result<PathBuf, OrientError> {
    if !input_path.exists() {
        return Err(OrientError::NotFound(input_path.to_path_buf()));
    }

    let image = image::open(input_path)
        .map_err(|e| OrientError::IoFailure(format!("Failed to load image: {}", e)))?;

    let cleaned = apply(image, opts);

    let file_name = input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture.png".to_string());
    let output_path = input_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("preprocessed_{}", file_name));

    cleaned
        .save(&output_path)
        .map_err(|e| OrientError::IoFailure(format!("Failed to save preprocessed image: {}", e)))?;

    Ok(output_path)
}
