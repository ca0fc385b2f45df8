use super::Ean13;
use crate::utils::binarization::Strategy;

/// A decoded code together with where and how it was found
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// The validated code
    pub code: Ean13,
    /// Thresholding strategy of the winning band
    pub strategy: Strategy,
    /// Rotation applied by the deskewer, in degrees
    pub deskew_degrees: f32,
    /// Row range `[y_min, y_max)` of the band in the working image
    pub band_rows: (usize, usize),
    /// Band row used as the scanline
    pub scanline_row: usize,
    /// Run index of the start guard
    pub start_run: usize,
    /// Samples per module used for the guards
    pub module: f64,
    /// Symbol was read right to left
    pub reversed: bool,
    /// Size of the working image when the input was downscaled
    pub downscaled: Option<(u32, u32)>,
}
