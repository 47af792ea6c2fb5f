use linearfit::geometry::{decompose, Geometry, Scale};
use linearfit::{iterative_fit, solve, FitConfig, FitError, FitMode, Point, RejectionPolicy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() < tol,
        "{what}: expected {expected}, got {actual} (tolerance {tol})"
    );
}

/// Smallest signed difference between two angles in degrees.
fn angle_diff(a: f64, b: f64) -> f64 {
    (a - b + 180.0).rem_euclid(360.0) - 180.0
}

fn square() -> Vec<Point> {
    vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]
}

fn scattered_catalog(rng: &mut StdRng, n: usize) -> Vec<Point> {
    (0..n)
        .map(|_| (rng.random_range(0.0..200.0), rng.random_range(0.0..200.0)))
        .collect()
}

fn similarity(offset: (f64, f64), rotation_deg: f64, scale: f64) -> Geometry {
    Geometry {
        offset,
        rotation_deg,
        scale: Scale::uniform(scale),
        reflected: false,
    }
}

#[test]
fn quarter_turn_of_a_square() {
    let reference = square();
    // frame rotation by +90 degrees maps (x, y) to (y, -x); then shift by (5, 5)
    let moving: Vec<Point> = reference.iter().map(|&(x, y)| (y + 5.0, -x + 5.0)).collect();

    let fit = solve(&moving, &reference, FitMode::General).unwrap();
    assert_close(fit.rotation_deg, 90.0, 1e-9, "rotation");
    assert_close(fit.scale.average, 1.0, 1e-9, "average scale");
    assert_close(fit.scale.x, 1.0, 1e-9, "x scale");
    assert_close(fit.scale.y, 1.0, 1e-9, "y scale");
    assert_close(fit.offset.0, 5.0, 1e-9, "x offset");
    assert_close(fit.offset.1, 5.0, 1e-9, "y offset");
}

#[test]
fn round_trip_recovers_known_geometry() {
    let mut rng = StdRng::seed_from_u64(11);
    let reference = scattered_catalog(&mut rng, 40);
    let cases = [
        similarity((3.25, -8.5), 0.0, 1.0),
        similarity((-120.0, 47.5), 33.0, 1.0005),
        similarity((0.5, 0.25), 187.5, 0.98),
        similarity((15.0, 15.0), 359.0, 1.2),
    ];

    for truth in cases {
        let moving = truth.to_coefficients().apply(&reference);
        for mode in [FitMode::General, FitMode::Rscale] {
            let fit = solve(&moving, &reference, mode).unwrap();
            let got = decompose(&fit.coefficients).unwrap();
            let tol = if mode == FitMode::Rscale { 1e-5 } else { 1e-9 };
            assert_close(angle_diff(got.rotation_deg, truth.rotation_deg), 0.0, tol, "rotation");
            assert_close(got.scale.average, truth.scale.average, tol, "scale");
            assert_close(got.offset.0, truth.offset.0, tol, "x offset");
            assert_close(got.offset.1, truth.offset.1, tol, "y offset");
        }
    }
}

#[test]
fn shift_round_trip() {
    let mut rng = StdRng::seed_from_u64(5);
    let reference = scattered_catalog(&mut rng, 12);
    let moving: Vec<Point> = reference.iter().map(|&(x, y)| (x - 4.75, y + 12.5)).collect();
    let fit = solve(&moving, &reference, FitMode::Shift).unwrap();
    let got = decompose(&fit.coefficients).unwrap();
    assert_close(got.offset.0, -4.75, 1e-9, "x offset");
    assert_close(got.offset.1, 12.5, 1e-9, "y offset");
    assert_eq!(got.rotation_deg, 0.0);
    assert_close(got.scale.average, 1.0, 1e-12, "scale");
}

#[test]
fn anisotropic_general_round_trip() {
    let mut rng = StdRng::seed_from_u64(23);
    let reference = scattered_catalog(&mut rng, 25);
    let truth = Geometry {
        offset: (-2.0, 6.5),
        rotation_deg: 71.0,
        scale: Scale {
            average: 1.015,
            x: 1.03,
            y: 1.0,
        },
        reflected: false,
    };
    let moving = truth.to_coefficients().apply(&reference);
    let fit = solve(&moving, &reference, FitMode::General).unwrap();
    assert_close(fit.rotation_deg, 71.0, 1e-9, "rotation");
    assert_close(fit.scale.x, 1.03, 1e-9, "x scale");
    assert_close(fit.scale.y, 1.0, 1e-9, "y scale");
    assert_close(fit.scale.average, 1.015, 1e-9, "average scale");
}

#[test]
fn noiseless_fits_leave_no_residuals() {
    let mut rng = StdRng::seed_from_u64(3);
    let reference = scattered_catalog(&mut rng, 30);
    let truth = similarity((7.0, -3.0), 48.0, 1.1);
    let moving = truth.to_coefficients().apply(&reference);
    for mode in [FitMode::General, FitMode::Rscale] {
        let fit = solve(&moving, &reference, mode).unwrap();
        assert!(fit.residual_rms() < 1e-9, "{mode}: rms {}", fit.residual_rms());
        assert!(fit.rms.0 < 1e-9 && fit.rms.1 < 1e-9);
    }
}

#[test]
fn pure_translation_has_no_rotation_or_scale() {
    let mut rng = StdRng::seed_from_u64(8);
    let reference = scattered_catalog(&mut rng, 15);
    let moving: Vec<Point> = reference.iter().map(|&(x, y)| (x + 21.5, y - 0.75)).collect();
    for mode in [FitMode::General, FitMode::Rscale] {
        let fit = solve(&moving, &reference, mode).unwrap();
        assert_close(angle_diff(fit.rotation_deg, 0.0), 0.0, 1e-9, "rotation");
        assert_close(fit.scale.average, 1.0, 1e-9, "scale");
        assert_close(fit.offset.0, 21.5, 1e-9, "x offset");
        assert_close(fit.offset.1, -0.75, 1e-9, "y offset");
    }
}

#[test]
fn rscale_matches_geomap_reference_values() {
    // Expected values computed with the IRAF geomap rscale formulation on the same lists.
    let reference = [
        (12.0, 7.5),
        (88.25, 14.0),
        (45.5, 61.75),
        (9.0, 93.0),
        (70.5, 80.25),
        (33.0, 29.5),
        (95.5, 52.0),
    ];
    let moving = [
        (16.950015, -2.240307),
        (95.059926, -12.682631),
        (62.729213, 44.853424),
        (32.971015, 84.407999),
        (91.987092, 57.889425),
        (42.966819, 15.196972),
        (110.817862, 23.904332),
    ];
    let fit = solve(&moving, &reference, FitMode::Rscale).unwrap();
    assert_close(fit.rotation_deg, 12.4914420503, 1e-5, "rotation");
    assert_close(fit.scale.average, 1.0299357310, 1e-5, "magnification");
    assert_close(fit.offset.0, 3.2101270166, 1e-5, "x shift");
    assert_close(fit.offset.1, -7.1062989263, 1e-5, "y shift");

    let flipped = [
        (-10.489, 9.493),
        (-86.754, 16.013),
        (-43.991, 63.752),
        (-7.512, 94.995),
        (-68.997, 82.258),
        (-31.494, 31.489),
        (-94.008, 54.004),
    ];
    let fit = solve(&flipped, &reference, FitMode::Rscale).unwrap();
    assert!(fit.reflected);
    assert_close(fit.rotation_deg, 0.0029767404, 1e-5, "rotation");
    assert_close(fit.scale.average, 1.0000469089, 1e-5, "magnification");
    assert_close(fit.offset.0, 1.5005760412, 1e-5, "x shift");
    assert_close(fit.offset.1, 1.9956808135, 1e-5, "y shift");
}

#[test]
fn swapping_roles_inverts_the_fit() {
    let mut rng = StdRng::seed_from_u64(17);
    let reference = scattered_catalog(&mut rng, 20);
    let truth = similarity((10.0, -20.0), 30.0, 2.0);
    let moving = truth.to_coefficients().apply(&reference);

    let forward = solve(&moving, &reference, FitMode::General).unwrap();
    let backward = solve(&reference, &moving, FitMode::General).unwrap();
    assert_close(forward.rotation_deg, 30.0, 1e-9, "forward rotation");
    assert_close(backward.rotation_deg, 330.0, 1e-9, "backward rotation");
    assert_close(forward.scale.average, 2.0, 1e-9, "forward scale");
    assert_close(backward.scale.average, 0.5, 1e-9, "backward scale");

    // the backward fit maps moving points onto the reference list
    let predicted = backward.coefficients.apply(&moving);
    for (p, r) in predicted.iter().zip(&reference) {
        assert_close(p.0, r.0, 1e-9, "x");
        assert_close(p.1, r.1, 1e-9, "y");
    }
}

#[test]
fn point_count_boundaries() {
    let two_ref = [(0.0, 0.0), (10.0, 5.0)];
    let two_mov = [(1.0, 1.0), (11.0, 6.0)];
    let fit = solve(&two_mov, &two_ref, FitMode::Shift).unwrap();
    assert_eq!(fit.offset, (1.0, 1.0));

    for mode in [FitMode::General, FitMode::Rscale] {
        assert!(matches!(
            solve(&two_mov, &two_ref, mode),
            Err(FitError::InsufficientPoints {
                required: 3,
                found: 2,
                ..
            })
        ));
    }

    let collinear = [(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)];
    let moved = [(1.0, 2.0), (6.0, 7.0), (11.0, 12.0)];
    assert!(matches!(
        solve(&moved, &collinear, FitMode::General),
        Err(FitError::SingularSystem)
    ));
}

/// Similarity transform of a random catalog with small noise, plus a few
/// pairs displaced far off the solution.
fn catalog_with_outliers(seed: u64) -> (Vec<Point>, Vec<Point>, usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let reference = scattered_catalog(&mut rng, 60);
    let truth = similarity((5.0, -9.0), 14.0, 1.01).to_coefficients();
    let outliers = [(11, (130.0, -120.0)), (29, (-125.0, -135.0)), (47, (140.0, 115.0))];

    let mut moving = truth.apply(&reference);
    for m in moving.iter_mut() {
        m.0 += rng.random_range(-0.05..0.05);
        m.1 += rng.random_range(-0.05..0.05);
    }
    for (idx, (dx, dy)) in outliers {
        moving[idx].0 += dx;
        moving[idx].1 += dy;
    }
    (moving, reference, outliers.len())
}

#[test]
fn clipping_is_monotonic_and_removes_outliers() {
    let (moving, reference, n_outliers) = catalog_with_outliers(42);

    for (mode, policy) in [
        (FitMode::General, RejectionPolicy::Radial),
        (FitMode::Rscale, RejectionPolicy::PerAxis),
    ] {
        let mut previous_count = usize::MAX;
        let mut first_rms = None;
        let mut last = None;
        for iterations in 0..=3 {
            let cfg = FitConfig {
                max_iterations: iterations,
                ..FitConfig::for_mode(mode)
            };
            assert_eq!(cfg.rejection_policy(), policy);
            let fit = iterative_fit(&moving, &reference, &cfg).unwrap();
            assert!(fit.num_points() <= previous_count, "{mode}: survivors grew");
            previous_count = fit.num_points();
            first_rms.get_or_insert(fit.residual_rms());
            last = Some(fit);
        }

        let fit = last.unwrap();
        let before = first_rms.unwrap();
        assert!(fit.residual_rms() <= before, "{mode}: rms rose after clipping");
        assert!(fit.num_points() <= reference.len() - n_outliers);
        assert!(fit.residual_rms() < 0.1, "{mode}: rms {}", fit.residual_rms());
        assert_close(fit.rotation_deg, 14.0, 0.1, "rotation");
        assert_close(fit.scale.average, 1.01, 2e-3, "scale");
    }
}

#[test]
fn min_objects_stops_clipping_early() {
    let (moving, reference, _) = catalog_with_outliers(7);
    let cfg = FitConfig {
        min_objects: reference.len(),
        ..FitConfig::for_mode(FitMode::General)
    };
    let fit = iterative_fit(&moving, &reference, &cfg).unwrap();
    let plain = solve(&moving, &reference, FitMode::General).unwrap();
    assert_eq!(fit, plain);
    assert_eq!(fit.surviving_moving, moving);
    assert_eq!(fit.surviving_reference, reference);
}
