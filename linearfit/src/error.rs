use thiserror::Error;

use crate::fit_mode::FitMode;

/// Errors raised while fitting or decomposing a linear transform.
///
/// Every variant is fatal to the fit attempt that produced it. The engine
/// never substitutes a default transform in place of a failed one.
#[derive(Error, Debug)]
pub enum FitError {
    /// Fewer matched points than the fit mode needs.
    #[error("{mode} fit needs at least {required} matched points, got {found}")]
    InsufficientPoints {
        mode: FitMode,
        required: usize,
        found: usize,
    },

    /// The moving and reference lists are not paired one-to-one.
    #[error("point lists differ in length: {moving} moving vs {reference} reference")]
    LengthMismatch { moving: usize, reference: usize },

    /// The normal-equations matrix cannot be inverted (collinear or repeated points).
    #[error("normal equations are singular; reference points are degenerate")]
    SingularSystem,

    /// The linear part of the coefficients has a zero determinant.
    #[error("coefficients have a zero determinant and cannot be decomposed")]
    DegenerateTransform,

    /// An inverse trigonometric argument left its domain during decomposition.
    #[error("{quantity} is outside its numeric domain ({value})")]
    NumericDomain { quantity: &'static str, value: f64 },

    /// A configuration value is unusable.
    #[error("invalid fit configuration: {0}")]
    InvalidConfig(String),

    /// A TOML configuration fragment failed to parse.
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FitError>;
