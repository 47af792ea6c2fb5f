use serde::{Deserialize, Serialize};

use crate::coefficients::Coefficients;
use crate::fit_mode::FitMode;
use crate::geometry::{Geometry, Scale};
use crate::point_set::Point;

/// The outcome of one solve.
///
/// A `FitResult` is a plain value: solving again, or clipping, produces a new
/// one rather than editing an existing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Mode the coefficients were solved in.
    pub mode: FitMode,

    /// Translation `(dx, dy)`.
    pub offset: (f64, f64),

    /// Rotation in degrees, within `[0, 360)`.
    pub rotation_deg: f64,

    /// Average scale and the per-axis split.
    pub scale: Scale,

    /// `true` if the solution includes an axis flip.
    pub reflected: bool,

    /// Reference → moving coefficients.
    pub coefficients: Coefficients,

    /// `moving − apply(reference)` for each surviving pair.
    pub residuals: Vec<Point>,

    /// Per-axis scatter of `residuals`.
    pub rms: (f64, f64),

    /// Moving-frame points the fit was solved on.
    pub surviving_moving: Vec<Point>,

    /// Reference points the fit was solved on, paired with `surviving_moving`.
    pub surviving_reference: Vec<Point>,
}

impl FitResult {
    /// Canonical geometry of this fit.
    pub fn geometry(&self) -> Geometry {
        Geometry {
            offset: self.offset,
            rotation_deg: self.rotation_deg,
            scale: self.scale,
            reflected: self.reflected,
        }
    }

    /// Number of matched pairs the fit used.
    pub fn num_points(&self) -> usize {
        self.surviving_moving.len()
    }

    /// Root-mean-square residual length. `0.0` for an empty fit.
    pub fn residual_rms(&self) -> f64 {
        if self.residuals.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.residuals.iter().map(|&(dx, dy)| dx * dx + dy * dy).sum();
        (sum / self.residuals.len() as f64).sqrt()
    }
}
