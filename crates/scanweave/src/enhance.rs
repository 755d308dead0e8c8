//! Image enhancement for recognition accuracy.
//!
//! The enhancer is a deterministic, stateless transform tuned for scanned
//! documents: grayscale, speckle denoising, local contrast equalization, and
//! adaptive binarization. It is a total function; when the input is too small
//! for the tile grid the output degrades to the plain grayscale conversion
//! instead of failing, so recognition always has something to work with.

use crate::{Result, ScanweaveError};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use imageproc::filter::{gaussian_blur_f32, median_filter};
use tracing::warn;

/// Tile grid used for local histogram equalization (8x8 tiles).
const TILE_GRID: u32 = 8;
/// Contrast clip limit, relative to a uniform histogram.
const CLIP_LIMIT: f32 = 3.0;
/// Gaussian sigma for the adaptive threshold neighborhood (11 px window).
const THRESHOLD_SIGMA: f32 = 2.0;
/// Constant subtracted from the local mean before thresholding.
const THRESHOLD_C: i16 = 2;
/// Below this dimension the tile grid degenerates; skip enhancement.
const MIN_DIMENSION: u32 = 2 * TILE_GRID;

/// Enhance a raw bitmap for recognition.
///
/// Steps: grayscale, 3x3 median denoise, contrast-limited adaptive histogram
/// equalization over an 8x8 tile grid, then binarization against a
/// Gaussian-weighted local mean. Output is always single-channel with the
/// input's dimensions, and byte-identical across repeated calls on identical
/// input.
pub fn enhance(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    match try_enhance(&gray) {
        Ok(enhanced) => enhanced,
        Err(e) => {
            warn!("Enhancement degraded to plain grayscale: {}", e);
            gray
        }
    }
}

fn try_enhance(gray: &GrayImage) -> Result<GrayImage> {
    let (width, height) = gray.dimensions();
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(ScanweaveError::validation(format!(
            "Image {}x{} too small for {}x{} tile equalization",
            width, height, TILE_GRID, TILE_GRID
        )));
    }

    let denoised = median_filter(gray, 1, 1);
    let equalized = equalize_adaptive(&denoised);
    Ok(threshold_adaptive(&equalized))
}

/// Contrast-limited adaptive histogram equalization.
///
/// Each tile gets its own clipped-histogram intensity mapping; pixel values
/// are bilinearly interpolated between the four surrounding tile mappings to
/// avoid visible tile seams.
fn equalize_adaptive(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let tile_w = width.div_ceil(TILE_GRID);
    let tile_h = height.div_ceil(TILE_GRID);

    // Identity mapping as the fallback for degenerate edge tiles.
    let identity: [u8; 256] = std::array::from_fn(|v| v as u8);
    let mut luts = vec![identity; (TILE_GRID * TILE_GRID) as usize];

    for ty in 0..TILE_GRID {
        for tx in 0..TILE_GRID {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);
            if x0 >= x1 || y0 >= y1 {
                continue;
            }

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[gray.get_pixel(x, y).0[0] as usize] += 1;
                }
            }
            let tile_pixels = (x1 - x0) * (y1 - y0);

            // Clip peaks and redistribute the excess across all bins so the
            // mapping keeps its total mass.
            let clip = ((CLIP_LIMIT * tile_pixels as f32 / 256.0) as u32).max(1);
            let mut excess = 0u32;
            for count in hist.iter_mut() {
                if *count > clip {
                    excess += *count - clip;
                    *count = clip;
                }
            }
            let bonus = excess / 256;
            let remainder = excess % 256;
            for (bin, count) in hist.iter_mut().enumerate() {
                *count += bonus + u32::from((bin as u32) < remainder);
            }

            let lut = &mut luts[(ty * TILE_GRID + tx) as usize];
            let mut cdf = 0u32;
            for (value, count) in hist.iter().enumerate() {
                cdf += count;
                lut[value] = (cdf as f32 * 255.0 / tile_pixels as f32).round() as u8;
            }
        }
    }

    let max_tile = (TILE_GRID - 1) as f32;
    ImageBuffer::from_fn(width, height, |x, y| {
        let fx = ((x as f32 + 0.5) / tile_w as f32 - 0.5).clamp(0.0, max_tile);
        let fy = ((y as f32 + 0.5) / tile_h as f32 - 0.5).clamp(0.0, max_tile);
        let tx0 = fx.floor() as u32;
        let ty0 = fy.floor() as u32;
        let tx1 = (tx0 + 1).min(TILE_GRID - 1);
        let ty1 = (ty0 + 1).min(TILE_GRID - 1);
        let wx = fx - tx0 as f32;
        let wy = fy - ty0 as f32;

        let value = gray.get_pixel(x, y).0[0] as usize;
        let lut_at = |tx: u32, ty: u32| luts[(ty * TILE_GRID + tx) as usize][value] as f32;

        let top = lut_at(tx0, ty0) * (1.0 - wx) + lut_at(tx1, ty0) * wx;
        let bottom = lut_at(tx0, ty1) * (1.0 - wx) + lut_at(tx1, ty1) * wx;
        let mapped = top * (1.0 - wy) + bottom * wy;
        Luma([mapped.round().clamp(0.0, 255.0) as u8])
    })
}

/// Binarize against a Gaussian-weighted local mean.
///
/// A pixel survives as white (255) when it exceeds the blurred neighborhood
/// mean minus a small constant, so text stays legible under spatially varying
/// illumination where a single global threshold would not.
fn threshold_adaptive(gray: &GrayImage) -> GrayImage {
    let blurred = gaussian_blur_f32(gray, THRESHOLD_SIGMA);
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let value = gray.get_pixel(x, y).0[0] as i16;
        let local_mean = blurred.get_pixel(x, y).0[0] as i16;
        if value > local_mean - THRESHOLD_C {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
