use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};
use crate::fit_mode::{FitMode, RejectionPolicy};

/// Options for [`iterative_fit`](crate::clipper::iterative_fit).
///
/// Missing fields take their defaults when deserialised, so a TOML fragment
/// only needs the values it changes:
///
/// ```
/// # use linearfit::config::FitConfig;
/// # use linearfit::fit_mode::FitMode;
/// let cfg = FitConfig::from_toml_str("mode = \"general\"\nsigma = 2.5").unwrap();
/// assert_eq!(cfg.mode, FitMode::General);
/// assert_eq!(cfg.sigma, 2.5);
/// assert_eq!(cfg.max_iterations, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Transform family to solve for.
    pub mode: FitMode,

    /// Rejection threshold in units of the residual dispersion.
    pub sigma: f64,

    /// Number of clip-and-refit rounds. `0` disables clipping.
    pub max_iterations: usize,

    /// Clipping stops before the surviving pairs drop below this count.
    pub min_objects: usize,

    /// Overrides the mode's default rejection policy when set.
    pub rejection: Option<RejectionPolicy>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            mode: FitMode::Rscale,
            sigma: 3.0,
            max_iterations: 3,
            min_objects: 3,
            rejection: None,
        }
    }
}

impl FitConfig {
    /// Default options for `mode`.
    pub fn for_mode(mode: FitMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML fragment.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: FitConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(FitError::InvalidConfig(format!(
                "sigma must be a positive finite number, got {}",
                self.sigma
            )));
        }
        Ok(())
    }

    /// The rejection policy in effect: the override if set, else the mode's default.
    pub fn rejection_policy(&self) -> RejectionPolicy {
        self.rejection
            .unwrap_or_else(|| self.mode.default_rejection())
    }

    /// Smallest subset the clipper may re-solve on.
    pub fn survivor_floor(&self) -> usize {
        self.min_objects.max(self.mode.min_points())
    }
}
