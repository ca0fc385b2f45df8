use image::GrayImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use crate::config::ScanConfig;
use crate::decoder::{DecodeOptions, decode_scanline};
use crate::detector::{Deskewed, best_band, binarize_candidates, deskew, rank_scanlines};
use crate::models::{Detection, Ean13};
use crate::utils::binarization::Strategy;
use crate::utils::grayscale::limit_size;

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Stage {
    /// Nothing ran (empty image)
    #[default]
    Start,
    /// Candidates produced
    Binarize,
    /// Candidates deskewed
    Deskew,
    /// A band was kept
    LocateBand,
    /// A scanline was chosen
    SelectScanline,
    /// Twelve digits were decoded
    Decode,
    /// Check digit appended, code produced
    Checksum,
}

impl Stage {
    /// Short label used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Binarize => "binarize",
            Stage::Deskew => "deskew",
            Stage::LocateBand => "locate_band",
            Stage::SelectScanline => "select_scanline",
            Stage::Decode => "decode",
            Stage::Checksum => "checksum",
        }
    }
}

/// Stage-level counters and measurements for one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanTelemetry {
    /// Last stage that completed
    pub stage: Stage,
    /// Working image size after optional downscaling
    pub working_size: (u32, u32),
    /// Strategies of the candidates, in order
    pub candidates: Vec<Strategy>,
    /// Rotation applied to each candidate, degrees
    pub deskew_degrees: Vec<f32>,
    /// Score of the kept band
    pub band_score: Option<f64>,
    /// Band row used as scanline, the decoded one when a read succeeded
    pub scanline_row: Option<usize>,
    /// Transitions on that row
    pub scanline_transitions: Option<usize>,
    /// Scanlines handed to the decoder
    pub scanlines_tried: usize,
    /// Runs in the scanline that decoded
    pub run_count: Option<usize>,
    /// Module estimate of the successful read
    pub module: Option<f64>,
}

/// Run every stage on one grayscale image
#[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
pub(crate) fn run(gray: &GrayImage, config: &ScanConfig) -> (Option<Detection>, ScanTelemetry) {
    let mut tel = ScanTelemetry::default();
    if gray.width() == 0 || gray.height() == 0 {
        return (None, tel);
    }

    let scaled = limit_size(gray, config.max_dimension, config.downscale_target);
    let downscaled = scaled.as_ref().map(|img| img.dimensions());
    let working = scaled.as_ref().unwrap_or(gray);
    tel.working_size = working.dimensions();
    if let Some((w, h)) = downscaled {
        debug!(w, h, "downscaled input");
    }

    let candidates = binarize_candidates(working, config);
    tel.candidates = candidates.iter().map(|c| c.strategy).collect();
    if candidates.is_empty() {
        return (None, tel);
    }
    tel.stage = Stage::Binarize;

    let deskewed: Vec<Deskewed> = candidates
        .iter()
        .map(|c| deskew(&c.binary, config))
        .collect();
    tel.deskew_degrees = deskewed.iter().map(|d| d.degrees).collect();
    tel.stage = Stage::Deskew;

    let Some(band) = best_band(candidates.iter().zip(deskewed.iter()), config) else {
        debug!("no band found");
        return (None, tel);
    };
    tel.band_score = Some(band.score);
    tel.stage = Stage::LocateBand;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let scanlines = rank_scanlines(&band.rows, config, &mut rng, config.scanline_attempts.max(1));
    let Some(first) = scanlines.first() else {
        return (None, tel);
    };
    tel.scanline_row = Some(first.row);
    tel.scanline_transitions = Some(first.transitions);
    tel.stage = Stage::SelectScanline;

    let options = DecodeOptions {
        verify_check_digit: config.verify_check_digit,
        try_reversed: config.try_reversed,
    };
    let mut decoded = None;
    for scanline in &scanlines {
        tel.scanlines_tried += 1;
        match decode_scanline(scanline, options) {
            Some(read) => {
                decoded = Some((scanline, read));
                break;
            }
            None => debug!(
                row = scanline.row,
                transitions = scanline.transitions,
                "scanline did not decode"
            ),
        }
    }
    let Some((scanline, read)) = decoded else {
        return (None, tel);
    };
    tel.scanline_row = Some(scanline.row);
    tel.scanline_transitions = Some(scanline.transitions);
    tel.run_count = Some(read.run_count);
    tel.module = Some(read.module);
    tel.stage = Stage::Decode;

    let code = Ean13::from_data_digits(&read.digits);
    tel.stage = Stage::Checksum;
    debug!(%code, strategy = band.strategy.name(), reversed = read.reversed, "decoded");

    let detection = Detection {
        code,
        strategy: band.strategy,
        deskew_degrees: band.deskew_degrees,
        band_rows: (band.y_min, band.y_max),
        scanline_row: scanline.row,
        start_run: read.start,
        module: read.module,
        reversed: read.reversed,
        downscaled,
    };
    (Some(detection), tel)
}
