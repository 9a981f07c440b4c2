//! Noise reduction on signals with additive Gaussian noise.

use chaoscope_noise::{LocalAverageConfig, ProjectiveConfig, local_average, local_projective};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

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

fn add_noise(clean: &[f64], sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).unwrap();
    clean.iter().map(|v| v + normal.sample(&mut rng)).collect()
}

fn rms_error(a: &[f64], b: &[f64]) -> f64 {
    let ss: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (ss / a.len() as f64).sqrt()
}

#[test]
fn projective_filter_reduces_error_on_henon() {
    let clean = henon(3000);
    let noisy = add_noise(&clean, 0.01, 7);
    let before = rms_error(&noisy, &clean);

    let config = ProjectiveConfig::new(5)
        .with_signal_dimension(2)
        .with_neighbors(30)
        .with_passes(2);
    let out = local_projective(&noisy, &config).unwrap();
    let after = rms_error(&out.series, &clean);

    assert_eq!(out.series.len(), clean.len());
    assert_eq!(out.passes_run(), 2);
    assert!(after < 0.9 * before, "rms error {before} -> {after}");
    assert!(out.passes[0].rms_correction > 0.0);
}

#[test]
fn local_average_reduces_error_on_sine() {
    let clean: Vec<f64> = (0..2000).map(|i| (i as f64 * 0.1).sin()).collect();
    let noisy = add_noise(&clean, 0.05, 3);
    let before = rms_error(&noisy, &clean);

    let out = local_average(&noisy, &LocalAverageConfig::new(0.15).with_dim(5)).unwrap();
    let after = rms_error(&out.series, &clean);
    assert!(after < 0.75 * before, "rms error {before} -> {after}");
}

#[test]
fn filters_are_deterministic() {
    let noisy = add_noise(&henon(600), 0.01, 1);
    let config = ProjectiveConfig::new(4).with_neighbors(15);
    assert_eq!(
        local_projective(&noisy, &config).unwrap(),
        local_projective(&noisy, &config).unwrap()
    );
}
