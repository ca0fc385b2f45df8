use std::sync::OnceLock;

/// Symbol set a digit was encoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeSet {
    /// Left half, odd parity (L)
    LeftOdd,
    /// Left half, even parity (G)
    LeftEven,
    /// Right half (R)
    Right,
}

impl CodeSet {
    fn index(self) -> usize {
        match self {
            CodeSet::LeftOdd => 0,
            CodeSet::LeftEven => 1,
            CodeSet::Right => 2,
        }
    }

    /// Module patterns of the ten digits, `'1'` = bar
    pub fn patterns(self) -> &'static [&'static str; 10] {
        match self {
            CodeSet::LeftOdd => &L_CODES,
            CodeSet::LeftEven => &G_CODES,
            CodeSet::Right => &R_CODES,
        }
    }
}

// Seven modules per digit. R is the complement of L, G is R mirrored.

/// Left-half odd parity (set A) patterns, `1` = bar
pub const L_CODES: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
    "0110111", "0001011",
];

/// Left-half even parity (set B) patterns
pub const G_CODES: [&str; 10] = [
    "0100111", "0110011", "0011011", "0100001", "0011101", "0111001", "0000101", "0010001",
    "0001001", "0010111",
];

/// Right-half (set C) patterns
pub const R_CODES: [&str; 10] = [
    "1110010", "1100110", "1101100", "1000010", "1011100", "1001110", "1010000", "1000100",
    "1001000", "1110100",
];

/// Left-half parity sequence for each leading digit
pub const PARITY_PATTERNS: [[CodeSet; 6]; 10] = {
    use CodeSet::{LeftEven as G, LeftOdd as L};
    [
        [L, L, L, L, L, L],
        [L, L, G, L, G, G],
        [L, L, G, G, L, G],
        [L, L, G, G, G, L],
        [L, G, L, L, G, G],
        [L, G, G, L, L, G],
        [L, G, G, G, L, L],
        [L, G, L, G, L, G],
        [L, G, L, G, G, L],
        [L, G, G, L, G, L],
    ]
};

/// Start and end guard, `'1'` = bar
pub const SIDE_GUARD: &str = "101";

/// Center guard, `'1'` = bar
pub const CENTER_GUARD: &str = "01010";

/// Run widths (in modules) of a module pattern
///
/// Every digit pattern has exactly four runs; shorter patterns leave
/// trailing zeros.
pub fn widths(pattern: &str) -> [u8; 4] {
    let mut out = [0u8; 4];
    let mut idx = 0;
    let mut prev: Option<u8> = None;
    for b in pattern.bytes() {
        if let Some(p) = prev {
            if p != b {
                idx += 1;
                if idx >= out.len() {
                    break;
                }
            }
        }
        out[idx] += 1;
        prev = Some(b);
    }
    out
}

static WIDTH_TABLES: OnceLock<[[[u8; 4]; 10]; 3]> = OnceLock::new();

fn width_tables() -> &'static [[[u8; 4]; 10]; 3] {
    WIDTH_TABLES.get_or_init(|| {
        let mut tables = [[[0u8; 4]; 10]; 3];
        for set in [CodeSet::LeftOdd, CodeSet::LeftEven, CodeSet::Right] {
            for (digit, pattern) in set.patterns().iter().enumerate() {
                tables[set.index()][digit] = widths(pattern);
            }
        }
        tables
    })
}

/// Digit whose pattern in `set` has exactly these run widths
pub fn lookup(set: CodeSet, run_widths: &[u8; 4]) -> Option<u8> {
    width_tables()[set.index()]
        .iter()
        .position(|w| w == run_widths)
        .map(|d| d as u8)
}

/// Leading digit implied by the left-half parity sequence
pub fn leading_digit(parity: &[CodeSet; 6]) -> Option<u8> {
    PARITY_PATTERNS
        .iter()
        .position(|p| p == parity)
        .map(|d| d as u8)
}
