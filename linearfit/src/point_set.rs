//! Matched point lists.
//!
//! Points are plain `(x, y)` tuples. A fit always takes two slices paired
//! index-to-index: the *moving* list (positions measured in the frame being
//! aligned, e.g. detected sources) first, the *reference* list (e.g. catalog
//! positions) second.

use crate::error::{FitError, Result};
use crate::fit_mode::FitMode;

/// A 2-D coordinate pair.
pub type Point = (f64, f64);

/// Checks that `moving` and `reference` are paired and long enough for `mode`.
pub fn check_pairs(moving: &[Point], reference: &[Point], mode: FitMode) -> Result<()> {
    if moving.len() != reference.len() {
        return Err(FitError::LengthMismatch {
            moving: moving.len(),
            reference: reference.len(),
        });
    }
    let required = mode.min_points();
    if moving.len() < required {
        return Err(FitError::InsufficientPoints {
            mode,
            required,
            found: moving.len(),
        });
    }
    Ok(())
}

/// Arithmetic mean of each axis. Returns `(0.0, 0.0)` for an empty slice.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x, ay + y));
    (sx / n, sy / n)
}

/// Copies the points whose `keep` flag is set, preserving order.
pub fn select(points: &[Point], keep: &[bool]) -> Vec<Point> {
    points
        .iter()
        .zip(keep)
        .filter(|&(_, &k)| k)
        .map(|(&p, _)| p)
        .collect()
}
