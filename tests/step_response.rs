//! Step-response behavior of the public filter API.

use approx::assert_relative_eq;
use sodyn::{Error, SecondOrderFilter, Vec3};

/// A varied but fully deterministic input sequence.
fn input_sequence(len: usize) -> Vec<(f32, Vec3)> {
    (0..len)
        .map(|i| {
            let t = i as f32 * 0.013;
            let dt = 0.008 + 0.006 * (t * 3.1).sin().abs();
            let target = Vec3::new(t.sin() * 2.0, (t * 0.7).cos(), t * 0.1);
            (dt, target)
        })
        .collect()
}

#[test]
fn identical_filters_produce_identical_trajectories() {
    let mut a = SecondOrderFilter::new(2.5, 0.6, 1.5, Vec3::ZERO).unwrap();
    let mut b = SecondOrderFilter::new(2.5, 0.6, 1.5, Vec3::ZERO).unwrap();

    for (dt, target) in input_sequence(500) {
        let pa = a.step(dt, target, None).unwrap();
        let pb = b.step(dt, target, None).unwrap();
        // Bit-for-bit: the step is a pure function of state and inputs.
        assert_eq!(pa, pb);
    }
}

#[test]
fn critically_damped_filter_settles_on_constant_target() {
    let start = Vec3::ZERO;
    let target = Vec3::new(4.0, 4.0, 4.0);
    let mut f = SecondOrderFilter::new(1.0, 1.0, 0.0, start).unwrap();

    for _ in 0..2000 {
        f.step(0.001, target, None).unwrap();
    }

    // Two seconds is ~12 time constants at f = 1; well inside 1%.
    let error = f.position().distance(target) / start.distance(target);
    assert!(error < 0.01, "settled error fraction {error}");
}

#[test]
fn underdamped_filter_overshoots_then_settles() {
    let start = Vec3::new(-5.0, 0.0, 0.0);
    let target = Vec3::new(-4.0, 0.0, 5.0);
    let mut f = SecondOrderFilter::new(1.0, 0.5, 2.0, start).unwrap();

    assert_eq!(f.position(), start);

    let total = start.distance(target);
    let mut peak_progress = 0.0f32;
    for _ in 0..2000 {
        let p = f.step(0.001, target, None).unwrap();
        peak_progress = peak_progress.max(p.distance(start) / total);
    }

    // z = 0.5 with r = 2 kicks past the target before settling back.
    assert!(peak_progress > 1.02, "no overshoot, peak {peak_progress}");
    let error = f.position().distance(target) / total;
    assert!(error < 0.05, "settled error fraction {error}");
}

#[test]
fn scalar_filter_tracks_a_constant_target() {
    let mut f = SecondOrderFilter::new(2.0, 1.0, 0.0, 0.0f32).unwrap();

    for _ in 0..2000 {
        f.step(0.001, 10.0, None).unwrap();
    }

    assert_relative_eq!(f.position(), 10.0, max_relative = 0.01);
}

#[test]
fn builder_defaults_build_a_usable_filter() {
    let mut f = SecondOrderFilter::builder().build(Vec3::ZERO).unwrap();
    assert!(!f.high_speed());

    let p = f.step(0.016, Vec3::new(1.0, 0.0, 0.0), None).unwrap();
    assert!(p.magnitude().is_finite());
    assert_eq!(p, f.position());
}

#[test]
fn construction_rejects_bad_frequency() {
    assert_eq!(
        SecondOrderFilter::new(0.0, 1.0, 0.0, Vec3::ZERO).unwrap_err(),
        Error::InvalidFrequency(0.0)
    );
    assert!(SecondOrderFilter::new(f32::NAN, 1.0, 0.0, Vec3::ZERO).is_err());
}

#[test]
fn rejected_step_does_not_disturb_the_trajectory() {
    let mut f = SecondOrderFilter::new(1.0, 0.7, 1.0, Vec3::ZERO).unwrap();
    let mut twin = f.clone();
    let target = Vec3::new(2.0, -1.0, 0.5);

    f.step(0.01, target, None).unwrap();
    twin.step(0.01, target, None).unwrap();

    assert_eq!(
        f.step(-0.5, target, None).unwrap_err(),
        Error::InvalidDeltaTime(-0.5)
    );

    for _ in 0..100 {
        assert_eq!(
            f.step(0.01, target, None).unwrap(),
            twin.step(0.01, target, None).unwrap()
        );
    }
}

#[test]
fn explicit_velocity_matching_finite_difference_reproduces_estimated_mode() {
    let start = Vec3::new(0.5, -0.5, 0.0);
    let mut estimated = SecondOrderFilter::new(1.5, 0.8, 2.0, start).unwrap();
    let mut explicit = estimated.clone();

    // Hand the explicit filter exactly the finite differences the estimating
    // filter computes internally; the trajectories must match bit-for-bit.
    let mut previous_target = start;
    for (dt, target) in input_sequence(300) {
        let fd_velocity = (target - previous_target) / dt;
        previous_target = target;

        let pa = estimated.step(dt, target, None).unwrap();
        let pb = explicit.step(dt, target, Some(fd_velocity)).unwrap();
        assert_eq!(pa, pb);
        assert_eq!(estimated.velocity(), explicit.velocity());
    }
}
