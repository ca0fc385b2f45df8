//! Small-angle skew correction from horizontal line structure
//!
//! The top and bottom ends of the bars form near-horizontal edges. Those
//! edges are found with Canny, filtered to horizontally oriented gradients,
//! and fed to a Hough accumulator. The median tilt of the surviving lines is
//! rotated away.

use image::{GrayImage, Luma};
use imageproc::edges::canny;
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use tracing::{debug, trace};

use crate::config::ScanConfig;
use crate::models::BitMatrix;

/// Inputs with fewer rows pass through unchanged
pub const MIN_DESKEW_HEIGHT: usize = 20;
/// Inputs with fewer columns pass through unchanged
pub const MIN_DESKEW_WIDTH: usize = 100;

const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;
const SUPPRESSION_RADIUS: u32 = 4;

/// Result of the deskew stage
#[derive(Debug, Clone)]
pub struct Deskewed {
    /// Binary image, same dimensions as the input
    pub binary: BitMatrix,
    /// Clockwise rotation applied, 0.0 when passed through
    pub degrees: f32,
}

/// Edge map keeping only edges whose gradient is mostly vertical
fn horizontal_edges(gray: &GrayImage) -> GrayImage {
    let mut edges = canny(gray, CANNY_LOW, CANNY_HIGH);
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    for (x, y, pixel) in edges.enumerate_pixels_mut() {
        if pixel.0[0] == 0 {
            continue;
        }
        let h = (gx.get_pixel(x, y).0[0] as i32).abs();
        let v = (gy.get_pixel(x, y).0[0] as i32).abs();
        if v <= h {
            pixel.0[0] = 0;
        }
    }
    edges
}

/// Signed tilt of a near-horizontal Hough line, positive when it rises to the right
fn line_tilt(line: &PolarLine, max_degrees: f32) -> Option<f32> {
    let tilt = 90.0 - line.angle_in_degrees as f32;
    (tilt.abs() < max_degrees).then_some(tilt)
}

fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Median tilt in degrees of qualifying lines, `None` when there are none
pub fn estimate_skew(binary: &BitMatrix, config: &ScanConfig) -> Option<f32> {
    let (h, w) = (binary.height(), binary.width());
    if h < MIN_DESKEW_HEIGHT || w < MIN_DESKEW_WIDTH {
        return None;
    }

    let gray = binary.to_gray();
    let edges = horizontal_edges(&gray);
    let options = LineDetectionOptions {
        vote_threshold: ((h.min(w) / 10) as u32).max(30),
        suppression_radius: SUPPRESSION_RADIUS,
    };
    let lines = detect_lines(&edges, options);

    let mut tilts: Vec<f32> = lines
        .iter()
        .filter_map(|line| line_tilt(line, config.deskew_max_degrees))
        .collect();
    trace!(lines = lines.len(), qualifying = tilts.len(), "hough lines");
    median(&mut tilts)
}

/// Rotate a binary image to cancel its measured skew
///
/// Small or line-free images and tilts under `deskew_min_degrees` pass
/// through. Exposed borders become background.
pub fn deskew(binary: &BitMatrix, config: &ScanConfig) -> Deskewed {
    let Some(tilt) = estimate_skew(binary, config) else {
        return Deskewed {
            binary: binary.clone(),
            degrees: 0.0,
        };
    };
    if tilt.abs() < config.deskew_min_degrees {
        trace!(tilt, "skew below threshold");
        return Deskewed {
            binary: binary.clone(),
            degrees: 0.0,
        };
    }

    // A line rising to the right comes back level under a clockwise turn
    let rotated = rotate_about_center(
        &binary.to_gray(),
        tilt.to_radians(),
        Interpolation::Bilinear,
        Luma([255u8]),
    );
    debug!(degrees = tilt, "deskewed candidate");

    Deskewed {
        binary: BitMatrix::from_gray(&rotated, |v| v < 128),
        degrees: tilt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_block(width: u32, height: u32) -> BitMatrix {
        // Vertical bars between rows 40 and 120
        let gray = GrayImage::from_fn(width, height, |x, y| {
            if (40..120).contains(&y) && x > 20 && x < width - 20 && (x / 5) % 2 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        BitMatrix::from_gray(&gray, |v| v < 128)
    }

    fn rotated(binary: &BitMatrix, degrees: f32) -> BitMatrix {
        let gray = rotate_about_center(
            &binary.to_gray(),
            degrees.to_radians(),
            Interpolation::Bilinear,
            Luma([255u8]),
        );
        BitMatrix::from_gray(&gray, |v| v < 128)
    }

    #[test]
    fn test_small_images_pass_through() {
        let binary = bar_block(99, 160);
        let out = deskew(&binary, &ScanConfig::default());
        assert_eq!(out.degrees, 0.0);
        assert_eq!(out.binary, binary);
    }

    #[test]
    fn test_blank_image_passes_through() {
        let binary = BitMatrix::new(300, 160);
        let out = deskew(&binary, &ScanConfig::default());
        assert_eq!(out.degrees, 0.0);
        assert_eq!(out.binary.count_ink(), 0);
    }

    #[test]
    fn test_level_bars_are_not_rotated() {
        let binary = bar_block(300, 160);
        let out = deskew(&binary, &ScanConfig::default());
        assert!(out.degrees.abs() < 1.0);
    }

    #[test]
    fn test_rotation_is_undone() {
        let binary = bar_block(300, 160);
        for angle in [-8.0f32, 8.0] {
            let tilted = rotated(&binary, angle);
            let out = deskew(&tilted, &ScanConfig::default());
            assert_eq!(out.binary.width(), 300);
            assert_eq!(out.binary.height(), 160);
            assert!(
                (out.degrees + angle).abs() <= 2.0,
                "angle {} corrected by {}",
                angle,
                out.degrees
            );
        }
    }

    #[test]
    fn test_median_of_even_count() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0, 10.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_line_tilt_window() {
        let level = PolarLine {
            r: 10.0,
            angle_in_degrees: 90,
        };
        let tilted = PolarLine {
            r: 10.0,
            angle_in_degrees: 80,
        };
        let steep = PolarLine {
            r: 10.0,
            angle_in_degrees: 60,
        };
        assert_eq!(line_tilt(&level, 22.5), Some(0.0));
        assert_eq!(line_tilt(&tilted, 22.5), Some(10.0));
        assert_eq!(line_tilt(&steep, 22.5), None);
    }
}
