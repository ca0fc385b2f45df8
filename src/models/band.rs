use super::BitMatrix;
use crate::utils::binarization::Strategy;

/// Rows of one binarized candidate that contain the barcode
///
/// Owns a copy of the cropped rows; it does not borrow the parent image.
#[derive(Debug, Clone)]
pub struct Band {
    /// Cropped binary rows
    pub rows: BitMatrix,
    /// First row of the crop in the (deskewed) candidate
    pub y_min: usize,
    /// One past the last row of the crop
    pub y_max: usize,
    /// Height of the image the band was cut from
    pub source_height: usize,
    /// Fraction of ink samples inside the band
    pub ink_fraction: f64,
    /// `0.7 * ink_fraction + 0.3 * height / source_height`
    pub score: f64,
    /// Thresholding strategy that produced the candidate
    pub strategy: Strategy,
    /// Rotation applied by the deskewer, in degrees
    pub deskew_degrees: f32,
}

impl Band {
    /// Number of rows in the band
    pub fn height(&self) -> usize {
        self.rows.height()
    }

    /// Number of samples per row
    pub fn width(&self) -> usize {
        self.rows.width()
    }
}
