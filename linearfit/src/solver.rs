//! Closed-form least-squares solvers, one per [`FitMode`].

use log::trace;
use nalgebra::{Matrix3, Vector3};

use crate::coefficients::Coefficients;
use crate::error::{FitError, Result};
use crate::fit_mode::FitMode;
use crate::fit_result::FitResult;
use crate::geometry::{decompose, normalize_degrees, Geometry, Scale};
use crate::point_set::{centroid, check_pairs, Point};
use crate::residuals::{residuals, rms};

/// Smallest accepted `1 − ρ²` of the reference coordinates, where `ρ` is
/// their correlation. Anything closer to collinear is treated as singular.
const MIN_REFERENCE_SPREAD: f64 = 1e-10;

/// Fits the linear transform that maps `reference` onto `moving`.
///
/// # Parameters
/// - `moving`: Positions measured in the frame being aligned.
/// - `reference`: Matching positions in the reference frame, paired by index.
/// - `mode`: Which family of transforms to solve for.
///
/// # Returns
/// A [`FitResult`] whose coefficients predict `moving` from `reference`,
/// together with the residuals on the input pairs.
///
/// # Errors
/// - [`FitError::LengthMismatch`] if the lists are not paired.
/// - [`FitError::InsufficientPoints`] below [`FitMode::min_points`].
/// - [`FitError::SingularSystem`] for collinear or coincident reference
///   points (GENERAL).
/// - [`FitError::DegenerateTransform`] when RSCALE finds zero magnification,
///   as happens when every moving point coincides.
/// - Decomposition errors for SHIFT/GENERAL coefficients that cannot be
///   expressed as offset, rotation and scale.
///
/// # Examples
/// ```
/// # use linearfit::fit_mode::FitMode;
/// # use linearfit::solver::solve;
/// let reference = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)];
/// let moving = [(2.0, 3.0), (12.0, 3.0), (2.0, 13.0)];
/// let fit = solve(&moving, &reference, FitMode::Shift).unwrap();
/// assert_eq!(fit.offset, (2.0, 3.0));
/// assert_eq!(fit.rotation_deg, 0.0);
/// ```
pub fn solve(moving: &[Point], reference: &[Point], mode: FitMode) -> Result<FitResult> {
    check_pairs(moving, reference, mode)?;
    match mode {
        FitMode::Shift => {
            let coefficients = fit_shift(moving, reference);
            let geometry = decompose(&coefficients)?;
            Ok(build_result(mode, coefficients, geometry, moving, reference))
        }
        FitMode::General => {
            let coefficients = fit_general(moving, reference)?;
            let geometry = decompose(&coefficients)?;
            Ok(build_result(mode, coefficients, geometry, moving, reference))
        }
        FitMode::Rscale => {
            let (coefficients, geometry) = fit_rscale(moving, reference)?;
            Ok(build_result(mode, coefficients, geometry, moving, reference))
        }
    }
}

fn build_result(
    mode: FitMode,
    coefficients: Coefficients,
    geometry: Geometry,
    moving: &[Point],
    reference: &[Point],
) -> FitResult {
    let resids = residuals(moving, reference, &coefficients);
    let rms = rms(&resids);
    FitResult {
        mode,
        offset: geometry.offset,
        rotation_deg: geometry.rotation_deg,
        scale: geometry.scale,
        reflected: geometry.reflected,
        coefficients,
        residuals: resids,
        rms,
        surviving_moving: moving.to_vec(),
        surviving_reference: reference.to_vec(),
    }
}

/// Mean offset `moving − reference` on each axis.
fn fit_shift(moving: &[Point], reference: &[Point]) -> Coefficients {
    let n = moving.len() as f64;
    let (sdx, sdy) = moving
        .iter()
        .zip(reference)
        .fold((0.0, 0.0), |(ax, ay), (&(u, v), &(x, y))| {
            (ax + (u - x), ay + (v - y))
        });
    Coefficients::from_shift(sdx / n, sdy / n)
}

/// Six-term affine fit from the 3×3 normal equations.
fn fit_general(moving: &[Point], reference: &[Point]) -> Result<Coefficients> {
    check_spread(reference)?;
    let n = reference.len() as f64;

    let (mut sx, mut sy, mut su, mut sv) = (0.0, 0.0, 0.0, 0.0);
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    let (mut sux, mut svx, mut suy, mut svy) = (0.0, 0.0, 0.0, 0.0);
    for (&(u, v), &(x, y)) in moving.iter().zip(reference) {
        sx += x;
        sy += y;
        su += u;
        sv += v;
        sxx += x * x;
        syy += y * y;
        sxy += x * y;
        sux += u * x;
        svx += v * x;
        suy += u * y;
        svy += v * y;
    }
    trace!("general fit sums: n={n} sx={sx} sy={sy} sxx={sxx} syy={syy} sxy={sxy}");

    let normal = Matrix3::new(
        sx, sy, n, //
        sxx, sxy, sx, //
        sxy, syy, sy,
    );
    let inverse = normal.try_inverse().ok_or(FitError::SingularSystem)?;
    let p = inverse * Vector3::new(su, sux, suy);
    let q = inverse * Vector3::new(sv, svx, svy);

    if !p.iter().chain(q.iter()).all(|c| c.is_finite()) {
        return Err(FitError::SingularSystem);
    }
    Ok(Coefficients::new([p[0], p[1], p[2]], [q[0], q[1], q[2]]))
}

/// Rejects reference points that lie on a line, judged from their centred
/// second moments so the test does not depend on the coordinate scale.
/// `try_inverse` alone only catches an exactly zero determinant.
fn check_spread(reference: &[Point]) -> Result<()> {
    let (x0, y0) = centroid(reference);
    let (mut cxx, mut cyy, mut cxy) = (0.0, 0.0, 0.0);
    for &(x, y) in reference {
        let (dx, dy) = (x - x0, y - y0);
        cxx += dx * dx;
        cyy += dy * dy;
        cxy += dx * dy;
    }
    let scatter = cxx * cyy;
    let collinear = scatter - cxy * cxy <= MIN_REFERENCE_SPREAD * scatter;
    if scatter <= 0.0 || !scatter.is_finite() || collinear {
        trace!("reference spread too small: cxx={cxx} cyy={cyy} cxy={cxy}");
        return Err(FitError::SingularSystem);
    }
    Ok(())
}

/// Rotation + single magnification + shift, from centred second moments.
///
/// The sign of `Sxrxi·Syryi − Syrxi·Sxryi` decides whether the solution is a
/// proper rotation or includes a flip, and which cross terms form the angle.
/// The shift places the reference centroid exactly on the moving centroid.
/// A zero magnification (all moving points coincide) has no inverse and is
/// reported as [`FitError::DegenerateTransform`].
fn fit_rscale(moving: &[Point], reference: &[Point]) -> Result<(Coefficients, Geometry)> {
    let (xr0, yr0) = centroid(reference);
    let (xi0, yi0) = centroid(moving);

    let (mut sxrxr, mut syryr) = (0.0, 0.0);
    let (mut sxrxi, mut syryi, mut syrxi, mut sxryi) = (0.0, 0.0, 0.0, 0.0);
    for (&(u, v), &(x, y)) in moving.iter().zip(reference) {
        let (xr, yr) = (x - xr0, y - yr0);
        let (xi, yi) = (u - xi0, v - yi0);
        sxrxr += xr * xr;
        syryr += yr * yr;
        sxrxi += xr * xi;
        syryi += yr * yi;
        syrxi += yr * xi;
        sxryi += xr * yi;
    }
    trace!(
        "rscale moments: sxrxr={sxrxr} syryr={syryr} sxrxi={sxrxi} syryi={syryi} syrxi={syrxi} sxryi={sxryi}"
    );

    let flipped = sxrxi * syryi - syrxi * sxryi < 0.0;
    let (num, den) = if flipped {
        (syrxi + sxryi, syryi - sxrxi)
    } else {
        (syrxi - sxryi, sxrxi + syryi)
    };

    let theta = if num == 0.0 && den == 0.0 {
        0.0
    } else {
        normalize_degrees(num.atan2(den).to_degrees())
    };
    let (sin, cos) = theta.to_radians().sin_cos();

    let spread = sxrxr + syryr;
    let mag = if spread <= 0.0 {
        1.0
    } else {
        (den * cos + num * sin) / spread
    };
    if mag <= 0.0 || !mag.is_finite() {
        return Err(FitError::DegenerateTransform);
    }

    let handed = if flipped { -1.0 } else { 1.0 };
    let cos_x = handed * mag * cos;
    let sin_x = mag * sin;
    let sin_y = handed * mag * sin;
    let cos_y = mag * cos;

    let xshift = xi0 - (xr0 * cos_x + yr0 * sin_x);
    let yshift = yi0 - (-xr0 * sin_y + yr0 * cos_y);

    let coefficients = Coefficients::new([cos_x, sin_x, xshift], [-sin_y, cos_y, yshift]);
    let geometry = Geometry {
        offset: (xshift, yshift),
        rotation_deg: theta,
        scale: Scale::uniform(mag),
        reflected: flipped,
    };
    Ok((coefficients, geometry))
}
