//! ISBN-13 normalization and checksum validation

/// Remove hyphens and whitespace from a candidate ISBN
pub fn normalize(candidate: &str) -> String {
    candidate
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Check whether `candidate` is a valid ISBN-13
///
/// Hyphens and whitespace are ignored. The remaining text must be exactly
/// 13 ASCII digits whose last digit matches the 1/3 weighted checksum of
/// the first twelve.
pub fn is_valid_isbn13(candidate: &str) -> bool {
    let digits = normalize(candidate);
    if digits.len() != 13 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let values: Vec<u32> = digits.bytes().map(|b| u32::from(b - b'0')).collect();
    let sum: u32 = values[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    let checksum = (10 - sum % 10) % 10;

    values[12] == checksum
}
