//! Scanner tunables
//!
//! `ScanConfig::default()` never touches the environment. Call
//! [`ScanConfig::from_env`] to let `EAN_*` variables override the defaults;
//! unparseable values fall back silently.

fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Every constant the pipeline stages depend on
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Images whose longer side exceeds this are downscaled first
    pub max_dimension: u32,
    /// Longer side after downscaling
    pub downscale_target: u32,
    /// Cap on distinct binarization candidates
    pub max_candidates: usize,
    /// Sigma of the noise-suppressing blur applied before thresholding, for
    /// an image whose longer side is `downscale_target`; scaled down with
    /// smaller images
    pub blur_sigma: f32,
    /// Block size (odd, in samples) of the adaptive threshold neighbourhood
    pub adaptive_block: u32,
    /// Offset subtracted from the local mean by the adaptive threshold
    pub adaptive_offset: i32,
    /// CLAHE tiles per axis
    pub clahe_tiles: usize,
    /// CLAHE clip limit, relative to a flat histogram
    pub clahe_clip_limit: f32,
    /// Deskew tilts below this magnitude (degrees) are ignored
    pub deskew_min_degrees: f32,
    /// Lines further than this (degrees) from horizontal are ignored
    pub deskew_max_degrees: f32,
    /// Images with fewer rows produce no band
    pub band_min_rows: usize,
    /// Minimum number of high-energy rows kept
    pub band_top_rows: usize,
    /// Rows added above and below the high-energy rows
    pub band_margin: usize,
    /// Evenly spaced scanline rows examined
    pub scanline_even_rows: usize,
    /// Randomly drawn scanline rows examined
    pub scanline_random_rows: usize,
    /// Scanlines decoded from one band, richest first, then nearest the
    /// band middle
    pub scanline_attempts: usize,
    /// Seed for the scanline sampler
    pub seed: u64,
    /// Reject reads whose printed check digit disagrees with the computed one
    pub verify_check_digit: bool,
    /// Retry the run sequence reversed (label upside down)
    pub try_reversed: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1200,
            downscale_target: 1000,
            max_candidates: 4,
            blur_sigma: 1.4,
            adaptive_block: 41,
            adaptive_offset: 10,
            clahe_tiles: 8,
            clahe_clip_limit: 2.5,
            deskew_min_degrees: 1.0,
            deskew_max_degrees: 22.5,
            band_min_rows: 30,
            band_top_rows: 30,
            band_margin: 15,
            scanline_even_rows: 15,
            scanline_random_rows: 25,
            scanline_attempts: 3,
            seed: 0x5eed_ea13,
            verify_check_digit: true,
            try_reversed: true,
        }
    }
}

impl ScanConfig {
    /// Defaults overridden by `EAN_*` environment variables
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            max_dimension: parse_env_u32("EAN_MAX_DIM", base.max_dimension).max(1),
            max_candidates: parse_env_usize("EAN_MAX_CANDIDATES", base.max_candidates).clamp(1, 5),
            deskew_min_degrees: parse_env_f32("EAN_DESKEW_MIN_DEG", base.deskew_min_degrees),
            scanline_random_rows: parse_env_usize(
                "EAN_SCANLINE_RANDOM_ROWS",
                base.scanline_random_rows,
            )
            .min(256),
            scanline_attempts: parse_env_usize("EAN_SCANLINE_ATTEMPTS", base.scanline_attempts)
                .clamp(1, 16),
            seed: parse_env_u64("EAN_SEED", base.seed),
            verify_check_digit: parse_env_bool_u8("EAN_VERIFY_CHECK", base.verify_check_digit),
            try_reversed: parse_env_bool_u8("EAN_TRY_REVERSED", base.try_reversed),
            ..base
        }
    }

    /// Same configuration with a different sampler seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let config = ScanConfig::default();
        assert_eq!(config.max_candidates, 4);
        assert_eq!(config.band_margin, 15);
        assert_eq!(config.scanline_attempts, 3);
        assert_eq!(config.adaptive_block % 2, 1);
        assert!(config.verify_check_digit);
    }

    #[test]
    fn test_unset_env_falls_back_to_default() {
        assert_eq!(parse_env_usize("EAN_TEST_SURELY_UNSET_VAR", 7), 7);
        assert!(parse_env_bool_u8("EAN_TEST_SURELY_UNSET_VAR", true));
    }

    #[test]
    fn test_with_seed() {
        assert_eq!(ScanConfig::default().with_seed(9).seed, 9);
    }
}
