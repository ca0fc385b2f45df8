//! Error types
//!
//! Failing to find a barcode is not an error: stages return `None` and the
//! public API reports "not found" as `Ok(None)`. Only input that cannot be
//! read as an image, and code strings that fail validation, produce errors.

use std::path::PathBuf;
use thiserror::Error;

/// Hard failures surfaced to the caller
#[derive(Debug, Error)]
pub enum ScanError {
    /// The image file is missing, unreadable or not a decodable raster
    #[error("failed to read image {}: {source}", path.display())]
    Unreadable {
        /// Path that was opened
        path: PathBuf,
        /// Underlying decoder or I/O failure
        #[source]
        source: image::ImageError,
    },

    /// An in-memory buffer could not be decoded as an image
    #[error("failed to decode image buffer: {0}")]
    Decode(#[from] image::ImageError),

    /// A raw pixel buffer does not match the stated dimensions
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        /// Bytes required by `width * height * channels`
        expected: usize,
        /// Bytes supplied
        actual: usize,
        /// Stated width
        width: usize,
        /// Stated height
        height: usize,
    },
}

/// Reasons a string is not a valid EAN-13 code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodeError {
    /// Wrong number of characters
    #[error("expected 13 digits, got {0}")]
    Length(usize),

    /// A character outside `0-9`
    #[error("invalid character {0:?}")]
    NonDigit(char),

    /// The last digit disagrees with the computed check digit
    #[error("check digit mismatch: expected {expected}, found {found}")]
    CheckDigit {
        /// Check digit computed from the first twelve digits
        expected: u8,
        /// Check digit present in the input
        found: u8,
    },
}

/// Alias used throughout the crate
pub type Result<T> = std::result::Result<T, ScanError>;
