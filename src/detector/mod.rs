//! Barcode localization modules
//!
//! This module contains the stages that run before decoding:
//! - Binarization candidates (adaptive, Otsu, CLAHE + Otsu)
//! - Skew estimation and correction
//! - Band location and scoring
//! - Scanline selection

/// Band location by row gradient energy
pub mod band;
/// Candidate binary images from independent thresholding strategies
pub mod binarizer;
/// Small-angle skew correction from Hough lines
pub mod deskew;
/// Scanline selection by transition count
pub mod scanline;

pub use band::{best_band, locate_band};
pub use binarizer::{Candidate, binarize_candidates};
pub use deskew::{Deskewed, deskew};
pub use scanline::{rank_scanlines, select_scanline};
