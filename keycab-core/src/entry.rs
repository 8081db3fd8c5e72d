//! Numeric entry accumulator
//!
//! Locomotive addresses, CV indices and CV values are all typed as up to
//! three decimal digits into a `u8`. The first digit replaces the target,
//! each further digit shifts it left one decimal place.

/// Most digits a single value can take
pub const MAX_DIGITS: u8 = 3;

/// Apply one typed digit to `target`
///
/// If the result would exceed 255, or would be a fourth digit, the target
/// falls back to `reset_to` and the entry length is cleared instead.
/// Returns false when that reset happened.
pub fn push_digit(target: &mut u8, len: &mut u8, digit: u8, reset_to: u8) -> bool {
    let (next, next_len) = if *len == 0 {
        (u16::from(digit), 1)
    } else {
        (u16::from(*target) * 10 + u16::from(digit), *len + 1)
    };

    match u8::try_from(next) {
        Ok(value) if next_len <= MAX_DIGITS => {
            *target = value;
            *len = next_len;
            true
        }
        _ => {
            *target = reset_to;
            *len = 0;
            false
        }
    }
}

/// Drop the last typed digit
///
/// Single-digit values are kept as they are; only the cursor moves back.
pub fn pop_digit(target: &mut u8, len: &mut u8) {
    if *len == 0 {
        return;
    }
    if *target > 9 {
        *target /= 10;
    }
    *len -= 1;
}

/// Number of decimal digits `value` is printed with
pub fn digit_count(value: u8) -> u8 {
    match value {
        100..=255 => 3,
        10..=99 => 2,
        _ => 1,
    }
}
