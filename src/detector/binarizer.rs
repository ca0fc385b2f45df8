//! Candidate binary images from independent thresholding strategies

use image::GrayImage;
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, trace};

use crate::config::ScanConfig;
use crate::models::BitMatrix;
use crate::utils::binarization::{
    Polarity, Strategy, adaptive_binarize, otsu_threshold, threshold_binarize,
};
use crate::utils::clahe::clahe;

/// Strategies in the order candidates are produced
pub const STRATEGY_ORDER: [Strategy; 5] = [
    Strategy::Adaptive,
    Strategy::Otsu(Polarity::DarkOnLight),
    Strategy::Otsu(Polarity::LightOnDark),
    Strategy::ClaheOtsu(Polarity::DarkOnLight),
    Strategy::ClaheOtsu(Polarity::LightOnDark),
];

/// One binarization of the input
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Binary image, `true` = ink
    pub binary: BitMatrix,
    /// Strategy that produced it
    pub strategy: Strategy,
}

/// Approximate content signature used to drop near-identical candidates
///
/// Equal to the pixel sum of the 0/255 rendering, bucketed by 1000.
pub fn signature(binary: &BitMatrix) -> u64 {
    ((binary.count_ink() as u64 * 255) as f64 / 1000.0).round() as u64
}

/// Blur sigma for an image of this size
///
/// `config.blur_sigma` applies at `config.downscale_target` pixels on the
/// longer side; smaller images get proportionally less blur so one-module
/// bars of two or three samples survive thresholding.
pub fn blur_sigma_for(width: u32, height: u32, config: &ScanConfig) -> f32 {
    let reference = config.downscale_target.max(1) as f32;
    let scale = (width.max(height) as f32 / reference).min(1.0);
    config.blur_sigma * scale
}

/// Produce up to `config.max_candidates` distinct candidates
///
/// Every strategy works on the same blurred copy. The list is never empty
/// for an image with pixels.
pub fn binarize_candidates(gray: &GrayImage, config: &ScanConfig) -> Vec<Candidate> {
    let sigma = blur_sigma_for(gray.width(), gray.height(), config);
    let blurred = if sigma > 0.0 {
        gaussian_blur_f32(gray, sigma)
    } else {
        gray.clone()
    };
    trace!(sigma, "pre-threshold blur");

    let mut otsu: Option<u8> = None;
    let mut equalized: Option<(GrayImage, u8)> = None;

    let mut candidates: Vec<Candidate> = Vec::with_capacity(config.max_candidates);
    let mut seen: Vec<u64> = Vec::with_capacity(config.max_candidates);

    for strategy in STRATEGY_ORDER {
        if candidates.len() >= config.max_candidates.max(1) {
            break;
        }

        let binary = match strategy {
            Strategy::Adaptive => {
                adaptive_binarize(&blurred, config.adaptive_block, config.adaptive_offset)
            }
            Strategy::Otsu(polarity) => {
                let t = *otsu.get_or_insert_with(|| otsu_threshold(&blurred));
                threshold_binarize(&blurred, t, polarity)
            }
            Strategy::ClaheOtsu(polarity) => {
                let (image, t) = equalized.get_or_insert_with(|| {
                    let image = clahe(&blurred, config.clahe_tiles, config.clahe_clip_limit);
                    let t = otsu_threshold(&image);
                    (image, t)
                });
                threshold_binarize(image, *t, polarity)
            }
        };

        let sig = signature(&binary);
        if seen.contains(&sig) {
            trace!(strategy = strategy.name(), signature = sig, "duplicate candidate dropped");
            continue;
        }
        seen.push(sig);

        debug!(
            strategy = strategy.name(),
            ink = binary.ink_fraction(),
            "binarization candidate"
        );
        candidates.push(Candidate { binary, strategy });
    }

    candidates
}
