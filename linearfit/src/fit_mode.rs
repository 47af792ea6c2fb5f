use std::fmt;

use serde::{Deserialize, Serialize};

/// The family of linear transforms a fit solves for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Translation only.
    Shift,
    /// Full six-term affine transform; X and Y may rotate and scale independently.
    General,
    /// Rotation, a single magnification and translation (restricted similarity).
    Rscale,
}

impl FitMode {
    /// Minimum number of matched points needed to solve in this mode.
    ///
    /// # Examples
    /// ```
    /// # use linearfit::fit_mode::FitMode;
    /// assert_eq!(FitMode::Shift.min_points(), 2);
    /// assert_eq!(FitMode::General.min_points(), 3);
    /// ```
    pub fn min_points(self) -> usize {
        match self {
            FitMode::Shift => 2,
            FitMode::General | FitMode::Rscale => 3,
        }
    }

    /// The outlier rejection policy used when the configuration does not pick one.
    pub fn default_rejection(self) -> RejectionPolicy {
        match self {
            FitMode::Shift | FitMode::General => RejectionPolicy::Radial,
            FitMode::Rscale => RejectionPolicy::PerAxis,
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FitMode::Shift => "shift",
            FitMode::General => "general",
            FitMode::Rscale => "rscale",
        };
        f.write_str(name)
    }
}

/// How the iterative clipper scores residuals against the current fit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// One threshold on the Euclidean residual length, `sigma` times the
    /// standard deviation of the residual lengths.
    Radial,
    /// Independent X and Y thresholds derived from the per-axis residual RMS,
    /// weighted by the degrees of freedom left after earlier rejections.
    PerAxis,
}
