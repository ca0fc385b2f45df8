use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;

use crate::models::BitMatrix;

/// Which side of a global threshold counts as ink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Dark bars printed on light paper
    DarkOnLight,
    /// Light bars on a dark ground
    LightOnDark,
}

/// Thresholding strategy that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Gaussian-weighted local mean threshold
    Adaptive,
    /// Global Otsu threshold
    Otsu(Polarity),
    /// Contrast-limited equalization followed by Otsu
    ClaheOtsu(Polarity),
}

impl Strategy {
    /// Short label used in logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Adaptive => "adaptive",
            Strategy::Otsu(Polarity::DarkOnLight) => "otsu",
            Strategy::Otsu(Polarity::LightOnDark) => "otsu_inv",
            Strategy::ClaheOtsu(Polarity::DarkOnLight) => "clahe_otsu",
            Strategy::ClaheOtsu(Polarity::LightOnDark) => "clahe_otsu_inv",
        }
    }
}

/// Convert grayscale image to binary using Otsu's thresholding method
pub fn otsu_binarize(gray: &GrayImage, polarity: Polarity) -> BitMatrix {
    threshold_binarize(gray, otsu_threshold(gray), polarity)
}

/// Calculate Otsu's optimal threshold
///
/// Samples strictly below the returned value form the dark class. A
/// single-valued histogram has no separating threshold and yields 128.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total_pixels: u64 = histogram.iter().sum();
    let total_sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(v, &c)| v as u64 * c)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;

    // Running sums over intensities below the candidate threshold
    let mut class1_pixels = 0u64;
    let mut class1_sum = 0u64;

    for threshold in 1..=255usize {
        class1_pixels += histogram[threshold - 1];
        class1_sum += (threshold as u64 - 1) * histogram[threshold - 1];
        let class2_pixels = total_pixels - class1_pixels;

        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = (total_sum - class1_sum) as f64 / class2_pixels as f64;

        let weight1 = class1_pixels as f64 / total_pixels as f64;
        let weight2 = class2_pixels as f64 / total_pixels as f64;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization
///
/// With `DarkOnLight`, samples below `threshold` are ink; `LightOnDark`
/// marks the complement.
pub fn threshold_binarize(gray: &GrayImage, threshold: u8, polarity: Polarity) -> BitMatrix {
    match polarity {
        Polarity::DarkOnLight => BitMatrix::from_gray(gray, |v| v < threshold),
        Polarity::LightOnDark => BitMatrix::from_gray(gray, |v| v >= threshold),
    }
}

/// Gaussian sigma matching an odd kernel of `size` samples
pub(crate) fn sigma_for_kernel(size: u32) -> f32 {
    0.3 * ((size.max(3) as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Local adaptive threshold against a Gaussian-weighted neighbourhood mean
///
/// A sample is ink when it is at most `mean - offset`, so flat regions of any
/// brightness stay background.
pub fn adaptive_binarize(gray: &GrayImage, block_size: u32, offset: i32) -> BitMatrix {
    let local_mean = gaussian_blur_f32(gray, sigma_for_kernel(block_size));
    let mut binary = BitMatrix::new(gray.width() as usize, gray.height() as usize);

    for (x, y, pixel) in gray.enumerate_pixels() {
        let mean = local_mean.get_pixel(x, y).0[0] as i32;
        if pixel.0[0] as i32 <= mean - offset {
            binary.set(x as usize, y as usize, true);
        }
    }

    binary
}
