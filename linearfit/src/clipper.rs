//! Iterative sigma clipping around the closed-form solvers.

use log::debug;

use crate::config::FitConfig;
use crate::error::Result;
use crate::fit_mode::RejectionPolicy;
use crate::fit_result::FitResult;
use crate::point_set::{select, Point};
use crate::residuals::{magnitudes, std_dev};
use crate::solver::solve;

/// Fits `reference` onto `moving`, then repeatedly rejects outlying pairs and
/// re-solves on the survivors.
///
/// Each round scores the current fit's residuals with the configured
/// [`RejectionPolicy`]:
/// - `Radial`: keep pairs whose residual length is below `sigma` times the
///   standard deviation of residual lengths.
/// - `PerAxis`: keep pairs under both per-axis cutoffs
///   `sigma * sqrt(rms / whtfrac)`, where `whtfrac = n / (n - removed - 1)`
///   with `n` the original pair count and `removed` the pairs already rejected.
///
/// There is no convergence test: exactly `config.max_iterations` rounds run
/// unless the survivors would fall below [`FitConfig::survivor_floor`] (or the
/// per-axis weight runs out of degrees of freedom), in which case the last
/// fit is returned unchanged. The returned result carries the surviving pairs.
///
/// # Errors
/// Configuration errors, and any solver error from the initial fit or a
/// refit on a clipped subset.
pub fn iterative_fit(moving: &[Point], reference: &[Point], config: &FitConfig) -> Result<FitResult> {
    config.validate()?;
    let policy = config.rejection_policy();
    let floor = config.survivor_floor();
    let total = moving.len();

    let mut fit = solve(moving, reference, config.mode)?;

    for iteration in 0..config.max_iterations {
        let keep = match policy {
            RejectionPolicy::Radial => radial_mask(&fit, config.sigma),
            RejectionPolicy::PerAxis => match per_axis_mask(&fit, config.sigma, total) {
                Some(mask) => mask,
                None => {
                    debug!(
                        "iteration {iteration}: no degrees of freedom left with {} of {total} pairs, stopping",
                        fit.num_points()
                    );
                    break;
                }
            },
        };

        let survivors = keep.iter().filter(|&&k| k).count();
        if survivors < floor {
            debug!(
                "iteration {iteration}: only {survivors} pairs would survive (floor {floor}), keeping previous fit"
            );
            break;
        }

        let moving_subset = select(&fit.surviving_moving, &keep);
        let reference_subset = select(&fit.surviving_reference, &keep);
        fit = solve(&moving_subset, &reference_subset, config.mode)?;
        debug!(
            "iteration {iteration}: kept {survivors} of {total} pairs, rms ({:.4}, {:.4})",
            fit.rms.0, fit.rms.1
        );
    }

    Ok(fit)
}

fn radial_mask(fit: &FitResult, sigma: f64) -> Vec<bool> {
    let lengths = magnitudes(&fit.residuals);
    let cutoff = sigma * std_dev(&lengths);
    debug!("radial cutoff {cutoff:.4}");
    lengths.iter().map(|&r| r < cutoff).collect()
}

/// `None` when `n - removed - 1` is no longer positive.
///
/// `removed` is taken from the fit being scored, so it already includes the
/// previous round's cut rather than trailing it by one round.
fn per_axis_mask(fit: &FitResult, sigma: f64, total: usize) -> Option<Vec<bool>> {
    let removed = total - fit.num_points();
    let dof = total as f64 - removed as f64 - 1.0;
    if dof <= 0.0 {
        return None;
    }
    let whtfrac = total as f64 / dof;
    let cut_x = sigma * (fit.rms.0 / whtfrac).sqrt();
    let cut_y = sigma * (fit.rms.1 / whtfrac).sqrt();
    debug!("per-axis cutoffs ({cut_x:.4}, {cut_y:.4}), whtfrac {whtfrac:.4}");
    Some(
        fit.residuals
            .iter()
            .map(|&(dx, dy)| dx.abs() < cut_x && dy.abs() < cut_y)
            .collect(),
    )
}
