//! Core data structures

/// Barcode band cropped from a binary candidate
pub mod band;
/// Validated EAN-13 code
pub mod code;
/// Decoded code with provenance
pub mod detection;
/// Packed binary image
pub mod matrix;
/// One sampled band row
pub mod scanline;

pub use band::Band;
pub use code::{Ean13, most_common};
pub use detection::Detection;
pub use matrix::BitMatrix;
pub use scanline::Scanline;
