//! Utility functions for image processing
//!
//! This module provides helper functions for barcode detection:
//! - Grayscale conversion (RGB/RGBA to luminance) and downscaling
//! - Binarization (Otsu's method, adaptive and fixed threshold)
//! - Contrast-limited histogram equalization

/// Global and adaptive thresholding
pub mod binarization;
/// Contrast-limited adaptive histogram equalization
pub mod clahe;
/// Color to luma conversion and downscaling
pub mod grayscale;
