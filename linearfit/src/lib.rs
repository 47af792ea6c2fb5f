//! # linearfit
//!
//! Least-squares linear transforms between two matched lists of 2-D points,
//! typically source positions measured in an image (*moving*) and their
//! catalog counterparts (*reference*). A fit yields the coefficients mapping
//! reference positions into the moving frame, the equivalent offset /
//! rotation / scale, and the residuals, optionally after iterative sigma
//! clipping of outliers.
//!
//! ## Overview of Modules
//!
//! - **`solver`**: Closed-form fits for the three [`FitMode`]s: shift only,
//!   general six-term affine, and rotation + single magnification (`rscale`).
//!
//! - **`clipper`**: Repeats solve → score residuals → reject until the
//!   iteration budget is spent or too few pairs would remain.
//!
//! - **`geometry`**: Decomposes raw coefficients into offset, rotation and
//!   per-axis scale, and builds coefficients back from that form.
//!
//! - **`coefficients`**: The `(P, Q)` coefficient pair and its forward
//!   application to point lists.
//!
//! - **`residuals`**: Residual vectors and their dispersion.
//!
//! - **`config`**: Clipping options, loadable from TOML.
//!
//! - **`fit_result`**, **`fit_mode`**, **`point_set`**, **`error`**: The
//!   value types shared by the above.
//!
//! Every function is pure; nothing is cached between calls. The crate logs
//! through the `log` facade and installs no logger of its own.
//!
//! ```
//! use linearfit::{iterative_fit, FitConfig, FitMode};
//!
//! let reference = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)];
//! let moving = [(5.0, 5.0), (5.0, -5.0), (15.0, 5.0), (15.0, -5.0)];
//! let fit = iterative_fit(&moving, &reference, &FitConfig::for_mode(FitMode::General)).unwrap();
//! assert!((fit.rotation_deg - 90.0).abs() < 1e-9);
//! ```

pub mod clipper;
pub mod coefficients;
pub mod config;
pub mod error;
pub mod fit_mode;
pub mod fit_result;
pub mod geometry;
pub mod point_set;
pub mod residuals;
pub mod solver;

pub use clipper::iterative_fit;
pub use coefficients::Coefficients;
pub use config::FitConfig;
pub use error::{FitError, Result};
pub use fit_mode::{FitMode, RejectionPolicy};
pub use fit_result::FitResult;
pub use geometry::{decompose, Geometry, Scale};
pub use point_set::Point;
pub use solver::solve;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
