//! Band location by row gradient energy
//!
//! Rows crossing the bars change value far more often than rows through
//! paper or print. The rows with the most changes are kept, padded by a
//! margin, and the crop is scored by ink density and relative height.

use tracing::{debug, trace};

use super::binarizer::Candidate;
use super::deskew::Deskewed;
use crate::config::ScanConfig;
use crate::models::{Band, BitMatrix};
use crate::utils::binarization::Strategy;

const INK_WEIGHT: f64 = 0.7;
const HEIGHT_WEIGHT: f64 = 0.3;

/// Horizontal gradient energy of every row
///
/// On a binary image this is the number of adjacent-sample changes.
pub fn row_energy(binary: &BitMatrix) -> Vec<usize> {
    (0..binary.height())
        .map(|y| binary.row_transitions(y))
        .collect()
}

/// Rows with the highest energy, `min(max(n / 10, top_rows), n / 2)` of them
///
/// Ties keep the upper row first.
fn top_energy_rows(energy: &[usize], top_rows: usize) -> Vec<usize> {
    let n = energy.len();
    let keep = (n / 10).max(top_rows).min(n / 2);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| energy[b].cmp(&energy[a]).then(a.cmp(&b)));
    order.truncate(keep);
    order
}

/// Crop one candidate to its barcode band and score it
///
/// Returns `None` for images with too few rows or a non-positive score.
pub fn locate_band(
    binary: &BitMatrix,
    strategy: Strategy,
    deskew_degrees: f32,
    config: &ScanConfig,
) -> Option<Band> {
    let height = binary.height();
    if height < config.band_min_rows {
        trace!(height, "too few rows for a band");
        return None;
    }

    let energy = row_energy(binary);
    let rows = top_energy_rows(&energy, config.band_top_rows);
    let lowest = *rows.iter().min()?;
    let highest = *rows.iter().max()?;

    let y_min = lowest.saturating_sub(config.band_margin);
    let y_max = (highest + config.band_margin).min(height);
    let cropped = binary.crop_rows(y_min, y_max);
    if cropped.height() == 0 {
        return None;
    }

    let ink_fraction = cropped.ink_fraction();
    let score =
        INK_WEIGHT * ink_fraction + HEIGHT_WEIGHT * (cropped.height() as f64 / height as f64);
    if score <= 0.0 {
        return None;
    }

    Some(Band {
        rows: cropped,
        y_min,
        y_max,
        source_height: height,
        ink_fraction,
        score,
        strategy,
        deskew_degrees,
    })
}

/// Highest-scoring band across deskewed candidates, earliest wins ties
pub fn best_band<'a, I>(candidates: I, config: &ScanConfig) -> Option<Band>
where
    I: IntoIterator<Item = (&'a Candidate, &'a Deskewed)>,
{
    let mut best: Option<Band> = None;
    for (candidate, deskewed) in candidates {
        let Some(band) = locate_band(
            &deskewed.binary,
            candidate.strategy,
            deskewed.degrees,
            config,
        ) else {
            continue;
        };
        debug!(
            strategy = candidate.strategy.name(),
            y_min = band.y_min,
            y_max = band.y_max,
            score = band.score,
            "band candidate"
        );
        if best.as_ref().is_none_or(|b| band.score > b.score) {
            best = Some(band);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::binarization::Polarity;

    fn striped_rows(height: usize, from: usize, to: usize) -> BitMatrix {
        let mut binary = BitMatrix::new(200, height);
        for y in from..to {
            for x in (20..180).step_by(4) {
                binary.set(x, y, true);
                binary.set(x + 1, y, true);
            }
        }
        binary
    }

    #[test]
    fn test_row_energy() {
        let binary = striped_rows(50, 10, 20);
        let energy = row_energy(&binary);
        assert_eq!(energy[0], 0);
        assert_eq!(energy[10], 80);
    }

    #[test]
    fn test_top_rows_never_exceed_half() {
        let energy = vec![1usize; 40];
        assert_eq!(top_energy_rows(&energy, 30).len(), 20);
        let energy = vec![1usize; 400];
        assert_eq!(top_energy_rows(&energy, 30).len(), 40);
        // Ties resolve to the upper rows
        assert_eq!(top_energy_rows(&[0, 5, 5, 1], 30), vec![1, 2]);
    }

    #[test]
    fn test_band_crops_around_bars() {
        let binary = striped_rows(200, 80, 120);
        let band = locate_band(&binary, Strategy::Adaptive, 0.0, &ScanConfig::default())
            .expect("band");
        assert_eq!(band.y_min, 65);
        assert_eq!(band.y_max, 124);
        assert_eq!(band.height(), 59);
        assert_eq!(band.width(), 200);
        assert!(band.score > 0.0);
    }

    #[test]
    fn test_too_few_rows() {
        let binary = striped_rows(29, 5, 20);
        assert!(locate_band(&binary, Strategy::Adaptive, 0.0, &ScanConfig::default()).is_none());
    }

    #[test]
    fn test_best_band_prefers_denser_ink() {
        let config = ScanConfig::default();
        let sparse = striped_rows(100, 40, 60);
        let dense = sparse.inverted();
        let candidates = [
            Candidate {
                binary: sparse.clone(),
                strategy: Strategy::Otsu(Polarity::DarkOnLight),
            },
            Candidate {
                binary: dense.clone(),
                strategy: Strategy::Otsu(Polarity::LightOnDark),
            },
        ];
        let deskewed = [
            Deskewed {
                binary: sparse,
                degrees: 0.0,
            },
            Deskewed {
                binary: dense,
                degrees: 0.0,
            },
        ];
        let best = best_band(candidates.iter().zip(deskewed.iter()), &config).expect("band");
        assert_eq!(best.strategy, Strategy::Otsu(Polarity::LightOnDark));
    }
}
