//! Background repair for rotated candidates.
//!
//! Recognition engines tend to mis-segment the sharp transparent borders
//! introduced by rotation as spurious text regions, which corrupts the
//! confidence signal the angle search depends on. Filling those borders with
//! the raster's dominant grayscale removes the artifact.

use image::{Rgba, RgbaImage};

/// Fallback fill when a raster has no fully-opaque pixels to sample.
const FALLBACK_FILL: u8 = 255;

/// Replace every fully-transparent pixel (alpha exactly zero) with the
/// dominant background gray, leaving all other pixels untouched. The
/// transparency test is binary: partially-transparent edge pixels are not
/// repainted. Returns the fill value used.
pub fn fill_transparent_background(image: &mut RgbaImage) -> u8 {
    let fill = dominant_grayscale(image).unwrap_or(FALLBACK_FILL);

    for pixel in image.pixels_mut() {
        if pixel.0[3] == 0 {
            *pixel = Rgba([fill, fill, fill, 255]);
        }
    }

    fill
}

/// Most frequent luminance bucket among fully-opaque pixels, or `None` for a
/// raster with no opaque pixels. Luminance is the plain channel average,
/// bucketed into 256 integer bins; bin ties keep the darker bin.
fn dominant_grayscale(image: &RgbaImage) -> Option<u8> {
    let mut histogram = [0u32; 256];
    let mut opaque_pixels = 0u64;

    for pixel in image.pixels() {
        if pixel.0[3] == u8::MAX {
            let lum = (pixel.0[0] as u32 + pixel.0[1] as u32 + pixel.0[2] as u32) / 3;
            histogram[lum as usize] += 1;
            opaque_pixels += 1;
        }
    }

    if opaque_pixels == 0 {
        return None;
    }

    let mut best_bin = 0usize;
    let mut best_count = 0u32;
    for (bin, &count) in histogram.iter().enumerate() {
        if count > best_count {
            best_count = count;
            best_bin = bin;
        }
    }

    Some(best_bin as u8)
}
