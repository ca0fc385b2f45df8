//! Convert RGB/RGBA buffers to 8-bit luma
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
//!
//! Rows are converted in parallel with rayon.

use image::GrayImage;
use image::imageops::{self, FilterType};
use rayon::prelude::*;

use crate::error::{Result, ScanError};

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8).min(255) as u8
}

fn to_gray(pixels: &[u8], width: usize, height: usize, channels: usize) -> Result<GrayImage> {
    let expected = width * height * channels;
    if pixels.len() < expected {
        return Err(ScanError::BufferSize {
            expected,
            actual: pixels.len(),
            width,
            height,
        });
    }

    let mut gray = vec![0u8; width * height];
    if width > 0 {
        gray.par_chunks_mut(width)
            .zip(pixels[..expected].par_chunks(width * channels))
            .for_each(|(out_row, in_row)| {
                for (dst, px) in out_row.iter_mut().zip(in_row.chunks_exact(channels)) {
                    *dst = luma(px[0], px[1], px[2]);
                }
            });
    }

    GrayImage::from_raw(width as u32, height as u32, gray).ok_or(ScanError::BufferSize {
        expected,
        actual: pixels.len(),
        width,
        height,
    })
}

/// Convert a packed RGB buffer (3 bytes per pixel) to grayscale
pub fn rgb_to_gray(rgb: &[u8], width: usize, height: usize) -> Result<GrayImage> {
    to_gray(rgb, width, height, 3)
}

/// Convert a packed RGBA buffer to grayscale (ignores alpha channel)
pub fn rgba_to_gray(rgba: &[u8], width: usize, height: usize) -> Result<GrayImage> {
    to_gray(rgba, width, height, 4)
}

/// Shrink images whose longer side exceeds `max_dim` so it becomes `target`
///
/// Returns `None` when the image is already small enough.
pub fn limit_size(gray: &GrayImage, max_dim: u32, target: u32) -> Option<GrayImage> {
    let (w, h) = gray.dimensions();
    let longer = w.max(h);
    if longer <= max_dim || longer == 0 {
        return None;
    }
    let target = target.min(max_dim).max(1);
    let scale = target as f64 / longer as f64;
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    Some(imageops::resize(gray, new_w, new_h, FilterType::Triangle))
}
