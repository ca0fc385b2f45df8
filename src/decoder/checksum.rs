/// EAN-13 check digit of twelve data digits
///
/// Digits at even (0-based) positions weigh 1, odd positions weigh 3.
pub fn check_digit(data: &[u8; 12]) -> u8 {
    let sum: u32 = data
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 } else { d as u32 * 3 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// True when the last of thirteen digits is the check digit of the first twelve
pub fn is_valid(digits: &[u8; 13]) -> bool {
    if digits.iter().any(|&d| d > 9) {
        return false;
    }
    let mut data = [0u8; 12];
    data.copy_from_slice(&digits[..12]);
    check_digit(&data) == digits[12]
}

/// Twelve data digits followed by their check digit
pub fn append_check(data: &[u8; 12]) -> [u8; 13] {
    let mut out = [0u8; 13];
    out[..12].copy_from_slice(data);
    out[12] = check_digit(data);
    out
}
