//! Residuals of a fit and their dispersion.

use crate::coefficients::Coefficients;
use crate::point_set::Point;

/// Per-point residual vectors `moving − apply(reference)`.
///
/// # Parameters
/// - `moving`: Measured positions in the moving frame.
/// - `reference`: Matching reference positions, same length and order.
/// - `coeffs`: Reference → moving coefficients of the fit under test.
///
/// # Examples
/// ```
/// # use linearfit::coefficients::Coefficients;
/// # use linearfit::residuals::residuals;
/// let fit = Coefficients::from_shift(1.0, 0.0);
/// let r = residuals(&[(1.0, 0.0), (2.5, 1.0)], &[(0.0, 0.0), (1.0, 1.0)], &fit);
/// assert_eq!(r, vec![(0.0, 0.0), (0.5, 0.0)]);
/// ```
pub fn residuals(moving: &[Point], reference: &[Point], coeffs: &Coefficients) -> Vec<Point> {
    moving
        .iter()
        .zip(reference)
        .map(|(&(u, v), &(x, y))| {
            let (pu, pv) = coeffs.transform(x, y);
            (u - pu, v - pv)
        })
        .collect()
}

/// Euclidean length of each residual vector.
pub fn magnitudes(resids: &[Point]) -> Vec<f64> {
    resids.iter().map(|&(dx, dy)| dx.hypot(dy)).collect()
}

/// Population standard deviation (`1/n` normalisation). `0.0` when empty.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// Per-axis scatter `(rms_x, rms_y)` of the residuals about their mean.
pub fn rms(resids: &[Point]) -> (f64, f64) {
    let xs: Vec<f64> = resids.iter().map(|r| r.0).collect();
    let ys: Vec<f64> = resids.iter().map(|r| r.1).collect();
    (std_dev(&xs), std_dev(&ys))
}
