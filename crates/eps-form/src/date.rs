//! Birth date reformatting and digit placement

use crate::FieldCoordinate;

/// Reorder a `YYYYMMDD` string into `DDMMYYYY`
///
/// Anything that is not exactly 8 characters after trimming yields an empty
/// string. No calendar validation is done.
pub fn reformat_birth_date(raw: &str) -> String {
    let chars: Vec<char> = raw.trim().chars().collect();
    if chars.len() != 8 {
        return String::new();
    }

    chars[6..8]
        .iter()
        .chain(&chars[4..6])
        .chain(&chars[0..4])
        .collect()
}

/// Pair each character of an 8-character string with its digit slot
///
/// Returns nothing unless `digits` has exactly 8 characters.
pub fn distribute_digits(
    digits: &str,
    slots: &[FieldCoordinate; 8],
) -> Vec<(char, FieldCoordinate)> {
    if digits.chars().count() != slots.len() {
        return Vec::new();
    }

    digits.chars().zip(slots.iter().copied()).collect()
}
