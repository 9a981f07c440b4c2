//! Dimension estimates on benchmark systems with known embedding dimension.

use approx::assert_abs_diff_eq;
use chaoscope_delay::{DelayCriterion, acf_delay};
use chaoscope_dimension::{AfnConfig, FnnConfig, afn, fnn};
use chaoscope_embed::ErrorKind;
use chaoscope_neighbors::Metric;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// x-coordinate of the Hénon map (a = 1.4, b = 0.3) after a transient.
fn henon(n: usize) -> Vec<f64> {
    let (mut x, mut y) = (0.1, 0.1);
    let mut out = Vec::with_capacity(n);
    for step in 0..n + 1000 {
        let next = 1.0 - 1.4 * x * x + y;
        y = 0.3 * x;
        x = next;
        if step >= 1000 {
            out.push(x);
        }
    }
    out
}

/// x-coordinate of the Lorenz system (σ = 10, ρ = 28, β = 8/3) by RK4 with
/// step 0.01, sampled every 3 steps after a transient.
fn lorenz(n: usize) -> Vec<f64> {
    fn f(s: [f64; 3]) -> [f64; 3] {
        [
            10.0 * (s[1] - s[0]),
            s[0] * (28.0 - s[2]) - s[1],
            s[0] * s[1] - 8.0 / 3.0 * s[2],
        ]
    }
    let h = 0.01;
    let mut s = [1.0, 1.0, 1.0];
    let mut out = Vec::with_capacity(n);
    for step in 0..(n + 700) * 3 {
        let k1 = f(s);
        let k2 = f(std::array::from_fn(|c| s[c] + 0.5 * h * k1[c]));
        let k3 = f(std::array::from_fn(|c| s[c] + 0.5 * h * k2[c]));
        let k4 = f(std::array::from_fn(|c| s[c] + h * k3[c]));
        s = std::array::from_fn(|c| s[c] + h / 6.0 * (k1[c] + 2.0 * k2[c] + 2.0 * k3[c] + k4[c]));
        if step % 3 == 2 && step >= 2100 {
            out.push(s[0]);
        }
    }
    out.truncate(n);
    out
}

#[test]
fn henon_fnn_vanishes_at_two() {
    let x = henon(2000);
    let curve = fnn(&x, 1..=4, &FnnConfig::new(1).with_window(0)).unwrap();
    let fractions: Vec<f64> = curve.combined().map(|(_, f)| f).collect();
    assert_eq!(fractions.len(), 4);
    assert!(fractions[0] > 0.5, "d=1: {}", fractions[0]);
    for (d, &f) in fractions.iter().enumerate().skip(1) {
        assert!(f < 0.05, "d={}: {f}", d + 1);
    }
    assert_eq!(curve.advisory_dimension(0.05), Some(2));
}

#[test]
fn lorenz_fnn_vanishes_by_three() {
    let x = lorenz(4000);
    let tau = acf_delay(&x, DelayCriterion::BelowInverseE, Some(200))
        .unwrap()
        .expect("autocorrelation falls below 1/e");
    // About a third of a time unit at this sampling.
    assert!((6..=20).contains(&tau), "tau = {tau}");
    let config = FnnConfig::new(tau).with_window(tau);
    let curve = fnn(&x, 1..=6, &config).unwrap();
    let fractions: Vec<(usize, f64)> = curve.combined().collect();
    assert_eq!(fractions.len(), 6);
    assert!(fractions[0].1 > 0.5, "d=1: {}", fractions[0].1);
    for &(d, f) in &fractions[2..] {
        assert!(f < 0.1, "d={d}: {f}");
    }
}

#[test]
fn henon_afn_separates_from_shuffled_baseline() {
    let x = henon(2000);
    let mut rng = StdRng::seed_from_u64(2024);
    let config = AfnConfig::new(1).with_window(0).with_shuffles(3);
    let curve = afn(&x, 4, &config, &mut rng).unwrap();

    let e1 = curve.e1();
    assert_eq!(e1.len(), 4);
    assert!(e1[0].1 < 0.7, "E1(1) = {}", e1[0].1);

    let sat = curve.saturation_dimension(0.2);
    assert!(matches!(sat, Some(2) | Some(3)), "saturation at {sat:?}");

    assert!(curve.e2_deviation().unwrap() > 0.1);
    assert_eq!(curve.shuffled_e2.len(), 4);
    for &(_, v) in &curve.shuffled_e2 {
        assert_abs_diff_eq!(v, 1.0, epsilon = 0.2);
    }
}

#[test]
fn afn_is_reproducible_with_seed() {
    let x = henon(600);
    let config = AfnConfig::new(1).with_window(0).with_metric(Metric::Euclidean);
    let a = afn(&x, 3, &config, &mut StdRng::seed_from_u64(5)).unwrap();
    let b = afn(&x, 3, &config, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn non_finite_input_is_rejected() {
    let mut x = henon(100);
    x[50] = f64::NAN;
    let err = fnn(&x, [1], &FnnConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}
