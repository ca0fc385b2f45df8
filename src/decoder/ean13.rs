use super::checksum::check_digit;
use super::pattern::match_digit;
use super::runs::{ModuleWidth, RunLengths};
use super::tables::{self, CodeSet, PARITY_PATTERNS, R_CODES};
use crate::models::{Ean13, Scanline};

/// Scanlines shorter than this cannot hold a symbol
pub const MIN_SCANLINE_SAMPLES: usize = 50;

const MIN_RUNS: usize = 5;
const SIDE_GUARD_RUNS: usize = 3;
const CENTER_GUARD_RUNS: usize = 5;
const RUNS_PER_DIGIT: usize = 4;
const DIGITS_PER_HALF: usize = 6;

/// Runs consumed from the start guard through the last right digit
pub const SYMBOL_RUNS: usize =
    SIDE_GUARD_RUNS + 2 * DIGITS_PER_HALF * RUNS_PER_DIGIT + CENTER_GUARD_RUNS;

const LEFT_SETS: [CodeSet; 2] = [CodeSet::LeftOdd, CodeSet::LeftEven];
const RIGHT_SETS: [CodeSet; 1] = [CodeSet::Right];

/// Decoder switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Abandon offsets whose printed check digit disagrees with the data
    pub verify_check_digit: bool,
    /// Retry with the runs reversed when the forward read fails
    pub try_reversed: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            verify_check_digit: true,
            try_reversed: true,
        }
    }
}

/// Twelve data digits read from one scanline
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRead {
    /// Leading digit, six left digits, first five right digits
    pub digits: [u8; 12],
    /// Sixth right digit as printed
    pub scanned_check: u8,
    /// Symbol set of each left digit
    pub parity: [CodeSet; 6],
    /// Run index of the start guard
    pub start: usize,
    /// Module estimate used for the guards
    pub module: f64,
    /// Number of runs in the scanline
    pub run_count: usize,
    /// Read from the reversed run sequence
    pub reversed: bool,
}

impl SymbolRead {
    /// Whether the printed check digit agrees with the data digits
    pub fn check_matches(&self) -> bool {
        check_digit(&self.digits) == self.scanned_check
    }
}

/// Decode twelve data digits from a scanline
pub fn decode_scanline(scanline: &Scanline, options: DecodeOptions) -> Option<SymbolRead> {
    if scanline.len() < MIN_SCANLINE_SAMPLES {
        return None;
    }

    let runs = RunLengths::from_samples(&scanline.samples);
    if let Some(read) = decode_runs(&runs, options.verify_check_digit) {
        return Some(read);
    }
    if options.try_reversed {
        let mut read = decode_runs(&runs.reversed(), options.verify_check_digit)?;
        read.reversed = true;
        return Some(read);
    }
    None
}

/// Search every start offset of a run sequence, first complete read wins
pub fn decode_runs(runs: &RunLengths, verify_check_digit: bool) -> Option<SymbolRead> {
    if runs.len() < MIN_RUNS {
        return None;
    }
    let module = runs.estimate_module()?;
    let last_start = runs.len().checked_sub(SYMBOL_RUNS)?;

    (0..=last_start).find_map(|offset| try_offset(&runs.runs, offset, module, verify_check_digit))
}

/// Decode a symbol whose start guard begins at run `offset`
pub fn try_offset(
    runs: &[u32],
    offset: usize,
    module: ModuleWidth,
    verify_check_digit: bool,
) -> Option<SymbolRead> {
    let symbol = runs.get(offset..offset + SYMBOL_RUNS)?;
    let (guard, rest) = symbol.split_at(SIDE_GUARD_RUNS);
    if !module.is_guard(guard) {
        return None;
    }

    let (left, rest) = rest.split_at(DIGITS_PER_HALF * RUNS_PER_DIGIT);
    let mut left_digits = [0u8; 6];
    let mut parity = [CodeSet::LeftOdd; 6];
    for (i, group) in left.chunks_exact(RUNS_PER_DIGIT).enumerate() {
        let (digit, set) = match_digit(group, &LEFT_SETS)?;
        left_digits[i] = digit;
        parity[i] = set;
    }

    let (center, right) = rest.split_at(CENTER_GUARD_RUNS);
    if !module.is_guard(center) {
        return None;
    }

    let mut right_digits = [0u8; 6];
    for (i, group) in right.chunks_exact(RUNS_PER_DIGIT).enumerate() {
        right_digits[i] = match_digit(group, &RIGHT_SETS)?.0;
    }

    let leading = tables::leading_digit(&parity)?;

    let mut digits = [0u8; 12];
    digits[0] = leading;
    digits[1..7].copy_from_slice(&left_digits);
    digits[7..12].copy_from_slice(&right_digits[..5]);

    let read = SymbolRead {
        digits,
        scanned_check: right_digits[5],
        parity,
        start: offset,
        module: module.samples(),
        run_count: runs.len(),
        reversed: false,
    };
    if verify_check_digit && !read.check_matches() {
        return None;
    }
    Some(read)
}

/// The 95 modules of a code, `true` = bar
pub fn encode_modules(code: &Ean13) -> [bool; 95] {
    let digits = code.digits();
    let parity = &PARITY_PATTERNS[digits[0] as usize];

    let mut pattern = String::with_capacity(95);
    pattern.push_str(tables::SIDE_GUARD);
    for (i, &d) in digits[1..7].iter().enumerate() {
        pattern.push_str(parity[i].patterns()[d as usize]);
    }
    pattern.push_str(tables::CENTER_GUARD);
    for &d in &digits[7..13] {
        pattern.push_str(R_CODES[d as usize]);
    }
    pattern.push_str(tables::SIDE_GUARD);

    let mut modules = [false; 95];
    for (m, b) in modules.iter_mut().zip(pattern.bytes()) {
        *m = b == b'1';
    }
    modules
}
