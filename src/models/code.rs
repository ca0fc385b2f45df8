use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::decoder::checksum::check_digit;
use crate::error::CodeError;

/// A validated 13-digit EAN-13 code
///
/// Only constructed from twelve data digits (the check digit is computed and
/// appended) or by parsing a string whose check digit verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ean13 {
    digits: [u8; 13],
}

impl Ean13 {
    /// Complete twelve data digits with their check digit
    ///
    /// Digits above 9 are reduced modulo 10.
    pub fn from_data_digits(data: &[u8; 12]) -> Self {
        let mut digits = [0u8; 13];
        for (dst, &src) in digits.iter_mut().zip(data.iter()) {
            *dst = src % 10;
        }
        let mut reduced = [0u8; 12];
        reduced.copy_from_slice(&digits[..12]);
        digits[12] = check_digit(&reduced);
        Self { digits }
    }

    /// All thirteen digits, check digit last
    pub fn digits(&self) -> &[u8; 13] {
        &self.digits
    }

    /// The twelve data digits
    pub fn data_digits(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out.copy_from_slice(&self.digits[..12]);
        out
    }

    /// Leading digit, carried by the parity of the left half
    pub fn leading_digit(&self) -> u8 {
        self.digits[0]
    }

    /// Check digit
    pub fn check(&self) -> u8 {
        self.digits[12]
    }
}

impl FromStr for Ean13 {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let count = trimmed.chars().count();
        if count != 13 {
            return Err(CodeError::Length(count));
        }

        let mut digits = [0u8; 13];
        for (slot, ch) in digits.iter_mut().zip(trimmed.chars()) {
            *slot = ch.to_digit(10).ok_or(CodeError::NonDigit(ch))? as u8;
        }

        let mut data = [0u8; 12];
        data.copy_from_slice(&digits[..12]);
        let expected = check_digit(&data);
        if expected != digits[12] {
            return Err(CodeError::CheckDigit {
                expected,
                found: digits[12],
            });
        }
        Ok(Self { digits })
    }
}

impl fmt::Display for Ean13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.digits {
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

/// Most frequent code in a batch of reads; the earliest seen wins ties
pub fn most_common<'a, I>(codes: I) -> Option<Ean13>
where
    I: IntoIterator<Item = &'a Ean13>,
{
    let mut counts: HashMap<Ean13, (usize, usize)> = HashMap::new();
    for (order, code) in codes.into_iter().enumerate() {
        counts.entry(*code).or_insert((0, order)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(code, _)| code)
}
