//! Arithmetic behind scoring. Everything here is total over its input domain.

use libm::sqrt;

/// Euclidean distance between two points in the 0–255 RGB cube
pub fn distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    let sum: u32 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x.abs_diff(y) as u32;
            d * d
        })
        .sum();
    sqrt(sum as f64)
}

/// Converts an error distance into a whole accuracy percentage.
///
/// The operations are evaluated in the same order as the historical score tables
/// (`100 - (error / max_error * 100)`), clamped at zero and truncated.
pub fn accuracy(error: f64, max_error: f64) -> u8 {
    let pct = 100.0 - (error / max_error * 100.0);
    if pct <= 0.0 { 0 } else { pct as u8 }
}

/// Percentage deducted for `hints` hints at `per_hint` percent each, saturating at 100
pub const fn penalty_percentage(hints: u32, per_hint: u8) -> u8 {
    let pct = hints as u64 * per_hint as u64;
    if pct > 100 { 100 } else { pct as u8 }
}

/// Applies a penalty percentage to a raw accuracy, flooring the result
pub const fn apply_penalty(raw: u8, penalty: u8) -> u8 {
    let penalty = if penalty > 100 { 100 } else { penalty };
    ((raw as u16 * (100 - penalty) as u16) / 100) as u8
}

/// Proportional integer mapping of `value` in `0..=from_max` onto `0..=to_max`
pub const fn scale(value: u32, from_max: u32, to_max: u32) -> u32 {
    if from_max == 0 {
        return 0;
    }
    let value = if value > from_max { from_max } else { value };
    (value as u64 * to_max as u64 / from_max as u64) as u32
}
