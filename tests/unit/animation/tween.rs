use super::*;

fn steps_to_converge(mut x: f64, target: f64, rate: f64) -> usize {
    let mut n = 0;
    while !is_converged(x, target) {
        x = lerp(x, target, rate);
        n += 1;
        assert!(n < 100_000, "did not converge");
    }
    n
}

#[test]
fn lerp_moves_fraction_of_remaining_distance() {
    assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    assert_eq!(lerp(10.0, 0.0, 0.25), 7.5);
    assert_eq!(lerp(3.0, 9.0, 1.0), 9.0);
    let p = lerp(Point::new(0.0, 0.0), Point::new(10.0, -20.0), 0.5);
    assert_eq!(p, Point::new(5.0, -10.0));
}

#[test]
fn convergence_is_reflexive() {
    for v in [-350.0, -10.0, 0.0, 0.125, 1.0, 255.0, 1e6] {
        assert!(is_converged(v, v));
    }
    assert!(points_converged(Point::new(1.0, 2.0), Point::new(1.0, 2.0)));
}

#[test]
fn convergence_uses_rounding_at_precision() {
    assert!(is_converged(1.004, 1.0));
    assert!(!is_converged(1.006, 1.0));
    assert!(is_converged_with(1.04, 1.0, 10.0));
    assert!(!is_converged_with(1.06, 1.0, 10.0));
}

#[test]
fn repeated_lerp_converges_within_log_bound() {
    for &(x0, target) in &[(0.0, -350.0), (-10.0, 280.0), (73.0, 100.0), (0.0, 1.0)] {
        for &rate in &[0.02, 0.05, 0.5, 0.9, 1.0] {
            let n = steps_to_converge(x0, target, rate);
            let dist: f64 = (x0 - target).abs();
            let bound = if rate >= 1.0 {
                1.0
            } else {
                ((0.5 / DEFAULT_PRECISION / dist).ln() / (1.0 - rate).ln()).ceil() + 1.0
            };
            assert!(
                (n as f64) <= bound,
                "x0={x0} target={target} rate={rate}: {n} steps > bound {bound}"
            );
        }
    }
}

#[test]
fn fade_ramps_clamp_and_finish() {
    let mut f = Fade::fade_in(0.02).unwrap();
    assert_eq!(f.value(), 0.0);
    let mut n = 0;
    while !f.is_done() {
        f.advance();
        n += 1;
    }
    assert!((50..=51).contains(&n));
    assert_eq!(f.value(), 1.0);

    let mut f = Fade::fade_out(0.3).unwrap();
    f.advance();
    f.advance();
    f.advance();
    assert!(!f.is_done());
    f.advance();
    assert!(f.is_done());
    assert_eq!(f.value(), 0.0);
}

#[test]
fn fade_and_glide_reject_bad_rates() {
    assert!(Fade::fade_in(0.0).is_err());
    assert!(Fade::fade_out(1.5).is_err());
    assert!(Glide::new(Point::ORIGIN, Point::new(1.0, 1.0), 0.0).is_err());
    assert!(Glide::new(Point::ORIGIN, Point::new(1.0, 1.0), f64::NAN).is_err());
}

#[test]
fn glide_arrives_at_target() {
    let mut g = Glide::new(Point::new(-10.0, 10.0), Point::new(-350.0, 100.0), 0.05).unwrap();
    assert!(!g.is_arrived());
    let mut n = 0;
    while !g.is_arrived() {
        g.advance();
        n += 1;
        assert!(n < 1000);
    }
    assert!(points_converged(g.current(), g.target()));
}

#[test]
fn lerp_snaps_onto_rounding_boundary_targets() {
    // 0.005 * 100 lands on a half, so stopping one ULP short never rounds equal.
    for &(x0, target, rate) in &[(-10.0, 0.005, 0.5), (400.0, 0.005, 0.5), (0.0, -2.375, 0.25)] {
        let n = steps_to_converge(x0, target, rate);
        assert!(n < 2_000, "{x0} -> {target} took {n} steps");
    }

    let mut x = 1.0f64;
    for _ in 0..2_000 {
        x = lerp(x, 0.005, 0.5);
    }
    assert_eq!(x, 0.005);

    let mut g = Glide::new(Point::new(50.0, 50.0), Point::new(0.005, 10.005), 0.5).unwrap();
    let mut n = 0;
    while !g.is_arrived() {
        g.advance();
        n += 1;
        assert!(n < 2_000);
    }
}
