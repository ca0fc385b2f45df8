use super::tables::{self, CodeSet};

/// Module totals tried in order when normalizing a digit's runs
pub const TARGET_MODULES: [u32; 3] = [7, 6, 8];

const MAX_ADJUSTMENTS: usize = 5;
const MIN_WIDTH: u8 = 1;
const MAX_WIDTH: u8 = 4;

/// Round four raw run lengths to integer module counts summing to `target`
///
/// Each run is scaled proportionally and rounded half to even. While the sum
/// is off, the first maximal element is nudged one module towards the target
/// (never below 1, never above 4), at most five times. The result is returned
/// even when the sum still misses the target.
pub fn normalize_widths(runs: &[u32; 4], target: u32) -> Option<[u8; 4]> {
    let total: u32 = runs.iter().sum();
    if total == 0 {
        return None;
    }

    let mut widths = [0u8; 4];
    for (w, &r) in widths.iter_mut().zip(runs.iter()) {
        let scaled = (r as f64 * target as f64 / total as f64).round_ties_even();
        *w = scaled.clamp(0.0, u8::MAX as f64) as u8;
    }

    for _ in 0..MAX_ADJUSTMENTS {
        let sum: u32 = widths.iter().map(|&w| w as u32).sum();
        if sum == target {
            break;
        }
        let i = first_max_index(&widths);
        if sum > target {
            widths[i] = widths[i].saturating_sub(1).max(MIN_WIDTH);
        } else {
            widths[i] = (widths[i] + 1).min(MAX_WIDTH);
        }
    }

    Some(widths)
}

fn first_max_index(widths: &[u8; 4]) -> usize {
    let mut best = 0;
    for (i, &w) in widths.iter().enumerate() {
        if w > widths[best] {
            best = i;
        }
    }
    best
}

/// Match four runs against the digit patterns of `sets`, in order
///
/// Returns the digit and the set that matched.
pub fn match_digit(runs: &[u32], sets: &[CodeSet]) -> Option<(u8, CodeSet)> {
    let runs: &[u32; 4] = runs.try_into().ok()?;
    for target in TARGET_MODULES {
        let Some(widths) = normalize_widths(runs, target) else {
            continue;
        };
        for &set in sets {
            if let Some(digit) = tables::lookup(set, &widths) {
                return Some((digit, set));
            }
        }
    }
    None
}
