//! Modular arithmetic for the 0/2π seam and for ring-to-ring sector mapping.

use std::f64::consts::{PI, TAU};

/// Normalizes `angle` into `[0, TAU)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly `TAU`, which is
/// folded back to `0.0` so the result never leaves the half-open range.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU { 0.0 } else { a }
}

/// Shortest unsigned distance between two angles, in `[0, PI]`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    ((a - b + PI).rem_euclid(TAU) - PI).abs()
}

/// `index + delta` wrapped into `0..count`.
pub fn wrap_index(index: usize, delta: isize, count: usize) -> usize {
    debug_assert!(count > 0);
    let count = count as isize;
    ((index as isize % count + delta % count + count) % count) as usize
}

/// Maps a sector index from a ring with `from` sectors onto a ring with `to`
/// sectors, scaling proportionally and rounding down.
pub fn scale_index(index: usize, from: usize, to: usize) -> usize {
    debug_assert!(from > 0 && to > 0);
    // u128 keeps the product exact for any usize inputs
    ((index as u128 * to as u128) / from as u128) as usize
}
