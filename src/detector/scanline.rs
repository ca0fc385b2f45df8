//! Scanline selection by transition count
//!
//! A band row through every bar changes value about sixty times. Rows are
//! sampled from the band and ranked by how often they change; the richest
//! row is the scanline, and rows nearest the band middle follow it.

use rand::Rng;
use tracing::trace;

use crate::config::ScanConfig;
use crate::models::{BitMatrix, Scanline};

const EDGE_ROWS: usize = 5;

/// `count` integers spread evenly over `[start, end]`, truncated
fn even_rows(start: usize, end: usize, count: usize) -> Vec<usize> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) as f64 / (count - 1) as f64;
            (0..count)
                .map(|i| start + (i as f64 * step) as usize)
                .collect()
        }
    }
}

/// Rows examined for a band of `height` rows
///
/// Bands of at most ten rows examine every row. Taller bands examine
/// evenly spaced rows plus rows drawn from `rng`, skipping five rows at
/// each edge; the evenly spaced rows are always present.
pub fn sample_rows<R: Rng + ?Sized>(height: usize, config: &ScanConfig, rng: &mut R) -> Vec<usize> {
    if height <= 2 * EDGE_ROWS {
        return (0..height).collect();
    }

    let even_count = config.scanline_even_rows.min(height - 2 * EDGE_ROWS);
    let mut rows = even_rows(EDGE_ROWS, height - EDGE_ROWS - 1, even_count);
    for _ in 0..config.scanline_random_rows {
        rows.push(rng.gen_range(EDGE_ROWS..height - EDGE_ROWS));
    }
    rows.sort_unstable();
    rows.dedup();
    rows
}

/// Row of a band with the most transitions
///
/// Ties go to the row nearest the middle of the band, then to the upper
/// row; edge rows carry blur from the bar ends. Bands shorter than three
/// rows use their first row directly.
pub fn select_scanline<R: Rng + ?Sized>(
    band: &BitMatrix,
    config: &ScanConfig,
    rng: &mut R,
) -> Option<Scanline> {
    rank_scanlines(band, config, rng, 1).into_iter().next()
}

/// Up to `limit` scanlines in the order the decoder should try them
///
/// The first is the [`select_scanline`] row. The rest are the remaining
/// sampled rows nearest the band middle, upper row first, so a richest row
/// made of bar ends or clutter is backed by rows through the bars.
pub fn rank_scanlines<R: Rng + ?Sized>(
    band: &BitMatrix,
    config: &ScanConfig,
    rng: &mut R,
    limit: usize,
) -> Vec<Scanline> {
    let height = band.height();
    if height == 0 || limit == 0 {
        return Vec::new();
    }
    if height < 3 {
        return vec![Scanline::new(band.row(0), 0)];
    }

    let rows = sample_rows(height, config, rng);
    let middle = height / 2;
    let Some((richest, transitions)) = rows
        .iter()
        .map(|&y| (y, band.row_transitions(y)))
        .max_by(|&(ya, ta), &(yb, tb)| {
            ta.cmp(&tb)
                .then_with(|| yb.abs_diff(middle).cmp(&ya.abs_diff(middle)))
                .then_with(|| yb.cmp(&ya))
        })
    else {
        return Vec::new();
    };
    trace!(row = richest, transitions, sampled = rows.len(), "scanline selected");

    let mut rest: Vec<usize> = rows.into_iter().filter(|&y| y != richest).collect();
    rest.sort_by_key(|&y| (y.abs_diff(middle), y));

    std::iter::once(richest)
        .chain(rest)
        .take(limit)
        .map(|y| Scanline::new(band.row(y), y))
        .collect()
}
