//! rust_ean - EAN-13 barcode recovery from photographs
//!
//! Given one photograph that may contain a printed EAN-13 barcode at a small
//! rotation, under uneven exposure, or in either polarity, recover the
//! 13-digit code or report that none was found.
//!
//! ```no_run
//! let gray = image::open("label.jpg").unwrap().to_luma8();
//! if let Some(code) = rust_ean::scan(&gray) {
//!     println!("{}", code);
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Scanner tunables
pub mod config;
/// EAN-13 decoding modules (run lengths, symbol tables, check digit)
pub mod decoder;
/// Localization modules (binarization, deskew, band, scanline)
pub mod detector;
/// Error types
pub mod error;
/// Core data structures (Ean13, BitMatrix, Band, etc.)
pub mod models;
mod pipeline;
/// Dataset and rendering helpers used by the CLI, tests and benches
pub mod tools;
/// Utility functions (grayscale, binarization, CLAHE)
pub mod utils;

pub use config::ScanConfig;
pub use error::{CodeError, Result, ScanError};
pub use models::{Band, BitMatrix, Detection, Ean13, Scanline, most_common};
pub use pipeline::{ScanTelemetry, Stage};

use image::GrayImage;
use rayon::prelude::*;
use std::path::Path;
use tracing::instrument;

/// Recover an EAN-13 code from a grayscale image with default settings
///
/// Returns `None` when no barcode could be read; this is never an error.
pub fn scan(gray: &GrayImage) -> Option<Ean13> {
    Scanner::default().scan(gray)
}

/// Load an image file and scan it
///
/// A missing or undecodable file is an error, distinct from `Ok(None)`.
pub fn scan_path<P: AsRef<Path>>(path: P) -> Result<Option<Ean13>> {
    Scanner::default().scan_path(path)
}

/// Decode an encoded image (PNG, JPEG, ...) from memory and scan it
pub fn scan_bytes(bytes: &[u8]) -> Result<Option<Ean13>> {
    Scanner::default().scan_bytes(bytes)
}

/// Scan a packed RGB buffer (3 bytes per pixel)
pub fn scan_rgb(rgb: &[u8], width: usize, height: usize) -> Result<Option<Ean13>> {
    Scanner::default().scan_rgb(rgb, width, height)
}

/// Scan a packed RGBA buffer (4 bytes per pixel, alpha ignored)
pub fn scan_rgba(rgba: &[u8], width: usize, height: usize) -> Result<Option<Ean13>> {
    Scanner::default().scan_rgba(rgba, width, height)
}

/// Scanner with configuration options
///
/// Holds no mutable state; one instance can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    /// Create a scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Create a scanner configured from `EAN_*` environment variables
    pub fn from_env() -> Self {
        Self::new(ScanConfig::from_env())
    }

    /// Active configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Recover a code from a grayscale image
    pub fn scan(&self, gray: &GrayImage) -> Option<Ean13> {
        self.detect(gray).map(|d| d.code)
    }

    /// Recover a code along with the band, scanline and strategy that produced it
    pub fn detect(&self, gray: &GrayImage) -> Option<Detection> {
        pipeline::run(gray, &self.config).0
    }

    /// Like `detect` but also returns stage-level telemetry
    pub fn detect_with_telemetry(&self, gray: &GrayImage) -> (Option<Detection>, ScanTelemetry) {
        pipeline::run(gray, &self.config)
    }

    /// Load an image file and scan it
    #[instrument(skip(self, path), fields(file = %path.as_ref().display()))]
    pub fn scan_path<P: AsRef<Path>>(&self, path: P) -> Result<Option<Ean13>> {
        let gray = tools::load_gray(path)?;
        Ok(self.scan(&gray))
    }

    /// Decode an encoded image from memory and scan it
    #[instrument(skip_all, fields(len = bytes.len()))]
    pub fn scan_bytes(&self, bytes: &[u8]) -> Result<Option<Ean13>> {
        let gray = image::load_from_memory(bytes)?.to_luma8();
        Ok(self.scan(&gray))
    }

    /// Scan a packed RGB buffer (3 bytes per pixel)
    pub fn scan_rgb(&self, rgb: &[u8], width: usize, height: usize) -> Result<Option<Ean13>> {
        let gray = utils::grayscale::rgb_to_gray(rgb, width, height)?;
        Ok(self.scan(&gray))
    }

    /// Scan a packed RGBA buffer (4 bytes per pixel, alpha ignored)
    pub fn scan_rgba(&self, rgba: &[u8], width: usize, height: usize) -> Result<Option<Ean13>> {
        let gray = utils::grayscale::rgba_to_gray(rgba, width, height)?;
        Ok(self.scan(&gray))
    }

    /// Scan independent images in parallel, results in input order
    pub fn scan_batch(&self, images: &[GrayImage]) -> Vec<Option<Ean13>> {
        images.par_iter().map(|gray| self.scan(gray)).collect()
    }

    /// Most frequent code across a burst of images of the same label
    pub fn scan_consensus(&self, images: &[GrayImage]) -> Option<Ean13> {
        let reads: Vec<Ean13> = self.scan_batch(images).into_iter().flatten().collect();
        most_common(&reads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::synth::{RenderOptions, render_ean13};
    use image::Luma;

    fn known() -> Ean13 {
        "4006381333931".parse().unwrap()
    }

    #[test]
    fn test_scan_empty() {
        assert_eq!(scan(&GrayImage::new(0, 0)), None);
        assert_eq!(scan(&GrayImage::from_pixel(300, 200, Luma([255]))), None);
    }

    #[test]
    fn test_scan_rendered() {
        let gray = render_ean13(&known(), &RenderOptions::default());
        assert_eq!(scan(&gray), Some(known()));
    }

    #[test]
    fn test_scan_rgb_matches_gray() {
        let gray = render_ean13(&known(), &RenderOptions::default());
        let rgb: Vec<u8> = gray.as_raw().iter().flat_map(|&v| [v, v, v]).collect();
        let code = scan_rgb(&rgb, gray.width() as usize, gray.height() as usize).unwrap();
        assert_eq!(code, Some(known()));
    }

    #[test]
    fn test_scan_rgba_ignores_alpha() {
        let gray = render_ean13(&known(), &RenderOptions::default());
        let rgba: Vec<u8> = gray.as_raw().iter().flat_map(|&v| [v, v, v, 0]).collect();
        let code = scan_rgba(&rgba, gray.width() as usize, gray.height() as usize).unwrap();
        assert_eq!(code, Some(known()));
        assert!(matches!(
            scan_rgba(&rgba[..12], 10, 10),
            Err(ScanError::BufferSize { expected: 400, .. })
        ));
    }

    #[test]
    fn test_scan_rgb_rejects_short_buffer() {
        assert!(matches!(
            scan_rgb(&[0u8; 10], 10, 10),
            Err(ScanError::BufferSize { .. })
        ));
    }

    #[test]
    fn test_scan_bytes_rejects_garbage() {
        assert!(matches!(
            scan_bytes(b"not an image"),
            Err(ScanError::Decode(_))
        ));
    }

    #[test]
    fn test_scanner_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scanner>();
    }

    #[test]
    fn test_consensus_over_batch() {
        let gray = render_ean13(&known(), &RenderOptions::default());
        let blank = GrayImage::from_pixel(300, 200, Luma([255]));
        let scanner = Scanner::default();
        let reads = scanner.scan_batch(&[gray.clone(), blank, gray.clone()]);
        assert_eq!(reads, vec![Some(known()), None, Some(known())]);
        assert_eq!(scanner.scan_consensus(&[gray]), Some(known()));
    }
}
