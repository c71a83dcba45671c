//! Candidate rendering: arbitrary-angle rotation with canvas expansion.
//!
//! Rotation is about the image center, clockwise for positive angles. The
//! output canvas is grown to contain the fully rotated source, so dimensions
//! generally change for non-multiple-of-90 angles. Newly exposed area is
//! filled fully transparent; the inpainter repairs it before scoring.

use crate::error::OrientError;
use crate::inpaint;
use image::{imageops, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Map an arbitrary angle into [0, 360).
pub fn normalize_angle(angle_deg: f32) -> f32 {
    angle_deg.rem_euclid(360.0)
}

/// Rotate a raster about its center by `angle_deg` (clockwise), producing a
/// new raster on an expanded canvas with transparent corners.
///
/// Multiples of 90 take an exact pixel-shuffling path; 0 returns a
/// pixel-identical copy.
pub fn rotate_rgba(src: &RgbaImage, angle_deg: f32) -> RgbaImage {
    let angle = normalize_angle(angle_deg);

    if angle == 0.0 {
        return src.clone();
    }
    if angle == 90.0 {
        return imageops::rotate90(src);
    }
    if angle == 180.0 {
        return imageops::rotate180(src);
    }
    if angle == 270.0 {
        return imageops::rotate270(src);
    }

    let (w, h) = src.dimensions();
    let theta = angle.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();

    let new_w = (w as f32 * cos_t.abs() + h as f32 * sin_t.abs()).ceil() as u32;
    let new_h = (w as f32 * sin_t.abs() + h as f32 * cos_t.abs()).ceil() as u32;

    let cx_src = (w as f32 - 1.0) * 0.5;
    let cy_src = (h as f32 - 1.0) * 0.5;
    let cx_dst = (new_w as f32 - 1.0) * 0.5;
    let cy_dst = (new_h as f32 - 1.0) * 0.5;

    // Inverse mapping: each destination pixel pulls from the source via the
    // reverse rotation, so the output has no holes.
    RgbaImage::from_fn(new_w, new_h, |x, y| {
        let dx = x as f32 - cx_dst;
        let dy = y as f32 - cy_dst;
        let sx = cos_t * dx + sin_t * dy + cx_src;
        let sy = -sin_t * dx + cos_t * dy + cy_src;
        sample_bilinear(src, sx, sy)
    })
}

/// Bilinear RGBA sample at a fractional source coordinate. Taps outside the
/// source bounds contribute transparency, so pixels along the rotated edge
/// come out partially transparent rather than hard-clipped.
fn sample_bilinear(src: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let (w, h) = src.dimensions();

    if !x.is_finite() || !y.is_finite() || x <= -1.0 || y <= -1.0 || x >= w as f32 || y >= h as f32
    {
        return TRANSPARENT;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let tap = |tx: i64, ty: i64| -> [f32; 4] {
        if tx < 0 || ty < 0 || tx >= w as i64 || ty >= h as i64 {
            return [0.0; 4];
        }
        let p = src.get_pixel(tx as u32, ty as u32).0;
        [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
    };

    let weights = [
        (tap(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (tap(x0 + 1, y0), fx * (1.0 - fy)),
        (tap(x0, y0 + 1), (1.0 - fx) * fy),
        (tap(x0 + 1, y0 + 1), fx * fy),
    ];

    let mut acc = [0.0f32; 4];
    for (px, weight) in weights {
        for (a, c) in acc.iter_mut().zip(px) {
            *a += c * weight;
        }
    }

    Rgba(acc.map(|c| c.round().clamp(0.0, 255.0) as u8))
}

/// Persist a rendered candidate under a collision-free name in `work_dir`.
///
/// The artifact's lifetime is the caller's responsibility; this crate never
/// deletes candidates it has written.
pub fn persist_candidate(raster: &RgbaImage, work_dir: &Path) -> Result<PathBuf, OrientError> {
    std::fs::create_dir_all(work_dir)
        .map_err(|e| OrientError::IoFailure(format!("Failed to create work dir: {}", e)))?;

    let temp = tempfile::Builder::new()
        .prefix("rotated_")
        .suffix(".png")
        .tempfile_in(work_dir)
        .map_err(|e| OrientError::IoFailure(format!("Failed to create temp file: {}", e)))?;

    let path = temp
        .into_temp_path()
        .keep()
        .map_err(|e| OrientError::IoFailure(format!("Failed to keep temp file: {}", e)))?;

    raster
        .save(&path)
        .map_err(|e| OrientError::IoFailure(format!("Failed to save candidate: {}", e)))?;

    Ok(path)
}

/// Standalone rotate-and-repair: load `image_path`, rotate it by
/// `angle_deg`, fill the exposed corners, and persist the result next to the
/// other candidates. Returns the new file's path.
pub fn rotate_image(
    image_path: &Path,
    angle_deg: f32,
    work_dir: &Path,
) -> Result<PathBuf, OrientError> {
    if !image_path.exists() {
        return Err(OrientError::NotFound(image_path.to_path_buf()));
    }

    let src = image::open(image_path)
        .map_err(|e| OrientError::IoFailure(format!("Failed to load image: {}", e)))?
        .to_rgba8();

    let mut rotated = rotate_rgba(&src, angle_deg);
    let fill = inpaint::fill_transparent_background(&mut rotated);
    tracing::debug!(
        angle = angle_deg,
        fill,
        width = rotated.width(),
        height = rotated.height(),
        "rotated image"
    );

    persist_candidate(&rotated, work_dir)
}
