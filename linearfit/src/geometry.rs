//! Canonical offset / rotation / scale view of a set of coefficients.
//!
//! Angles follow the frame-rotation convention used throughout the crate: a
//! rotation of `θ` with average scale `s` and no skew is written
//!
//! ```text
//!   u = dx + s * ( cos θ * x + sin θ * y)
//!   v = dy + s * (-sin θ * x + cos θ * y)
//! ```

use serde::{Deserialize, Serialize};

use crate::coefficients::Coefficients;
use crate::error::{FitError, Result};

/// Tolerance by which the skew arcsine argument may overshoot ±1 before it
/// is treated as a domain error instead of rounding noise.
const ASIN_SLACK: f64 = 1e-9;

/// Average scale and its split between the two axes.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub average: f64,
    pub x: f64,
    pub y: f64,
}

impl Scale {
    /// The same magnification on both axes.
    pub fn uniform(s: f64) -> Self {
        Scale {
            average: s,
            x: s,
            y: s,
        }
    }
}

/// A transform expressed as offset, rotation in degrees and scale.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub offset: (f64, f64),

    /// Rotation in degrees, within `[0, 360)`.
    pub rotation_deg: f64,

    pub scale: Scale,

    /// `true` when the linear part has a negative determinant (includes a flip).
    pub reflected: bool,
}

impl Geometry {
    /// Builds the coefficients that [`decompose`] maps back onto this geometry.
    ///
    /// Only skew-free transforms are representable, so
    /// `decompose(&g.to_coefficients())` reproduces `g` up to rounding. The
    /// per-axis scales drive the result; `scale.average` is not consulted.
    ///
    /// # Examples
    /// ```
    /// # use linearfit::geometry::{decompose, Geometry, Scale};
    /// let g = Geometry {
    ///     offset: (12.0, -3.5),
    ///     rotation_deg: 30.0,
    ///     scale: Scale { average: 1.1, x: 1.2, y: 1.0 },
    ///     reflected: false,
    /// };
    /// let back = decompose(&g.to_coefficients()).unwrap();
    /// assert!((back.rotation_deg - 30.0).abs() < 1e-9);
    /// assert!((back.scale.x - 1.2).abs() < 1e-9);
    /// ```
    pub fn to_coefficients(&self) -> Coefficients {
        let handed = if self.reflected { -1.0 } else { 1.0 };
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
        let (sx, sy) = (self.scale.x, self.scale.y);
        Coefficients {
            p: [handed * sx * cos, sy * sin, self.offset.0],
            q: [-handed * sx * sin, sy * cos, self.offset.1],
        }
    }
}

/// Folds an angle in degrees into `[0, 360)`.
pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    let folded = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

/// Converts raw coefficients into offset, rotation and per-axis scale.
///
/// The handedness `p` is the sign of `P0·Q1 − P1·Q0`. The rotation is
/// `atan2(P1 − p·Q0, p·P0 + Q1)` and the average scale is the projection of
/// the same two terms onto that direction. The per-axis split `avg ± d`
/// divides by the cosine of the skew angle `α = asin(r)` with
/// `r = (−p·P0·sinθ − p·Q0·cosθ) / (2·avg)`.
///
/// Arcsine clamping policy: `r` within `1e-9` beyond ±1 is clamped onto ±1;
/// a larger excursion, a non-finite `r`, or `cos α` at or below machine
/// epsilon yields [`FitError::NumericDomain`]. Because `r` is normalised by
/// the average scale it stays within ±1/2 for finite coefficients, so in
/// practice the guard only fires on overflow.
///
/// # Errors
/// - [`FitError::DegenerateTransform`] if the determinant is zero or not finite.
/// - [`FitError::NumericDomain`] per the clamping policy above.
pub fn decompose(coeffs: &Coefficients) -> Result<Geometry> {
    let [p0, p1, p2] = coeffs.p;
    let [q0, q1, q2] = coeffs.q;

    let det = coeffs.determinant();
    if det == 0.0 || !det.is_finite() {
        return Err(FitError::DegenerateTransform);
    }
    let handed = if det > 0.0 { 1.0 } else { -1.0 };

    let theta = (p1 - handed * q0).atan2(handed * p0 + q1);
    let (sin, cos) = theta.sin_cos();

    let average = ((handed * p0 + q1) * cos + (p1 - handed * q0) * sin) / 2.0;
    if !average.is_finite() || average <= 0.0 {
        return Err(FitError::NumericDomain {
            quantity: "average scale",
            value: average,
        });
    }

    let ratio = (-handed * p0 * sin - handed * q0 * cos) / (2.0 * average);
    if !ratio.is_finite() || ratio.abs() > 1.0 + ASIN_SLACK {
        return Err(FitError::NumericDomain {
            quantity: "skew arcsine argument",
            value: ratio,
        });
    }
    let alpha = ratio.clamp(-1.0, 1.0).asin();
    let cos_alpha = alpha.cos();
    if cos_alpha <= f64::EPSILON {
        return Err(FitError::NumericDomain {
            quantity: "skew cosine",
            value: cos_alpha,
        });
    }

    let d = ((handed * p0 - q1) * cos - (p1 + handed * q0) * sin) / (2.0 * cos_alpha);

    Ok(Geometry {
        offset: (p2, q2),
        rotation_deg: normalize_degrees(theta.to_degrees()),
        scale: Scale {
            average,
            x: average + d,
            y: average - d,
        },
        reflected: handed < 0.0,
    })
}
