//! Exponent estimates on systems with known largest exponent.

use chaoscope_embed::{EmbeddedTrajectory, embed};
use chaoscope_lyapunov::{FitWindow, LyapunovConfig, divergence_embedded, max_lyapunov};

/// Hénon map (a = 1.4, b = 0.3) after a transient, as `(x, y)` pairs.
fn henon(n: usize) -> Vec<[f64; 2]> {
    let (mut x, mut y) = (0.1, 0.1);
    let mut out = Vec::with_capacity(n);
    for step in 0..n + 1000 {
        let next = 1.0 - 1.4 * x * x + y;
        y = 0.3 * x;
        x = next;
        if step >= 1000 {
            out.push([x, y]);
        }
    }
    out
}

fn henon_x(n: usize) -> Vec<f64> {
    henon(n).iter().map(|p| p[0]).collect()
}

// The largest exponent of the Hénon map is about 0.42 per iteration.

#[test]
fn henon_exponent_with_fixed_window() {
    let traj = embed(&henon_x(3000), 1, 2).unwrap();
    let config = LyapunovConfig::new(30).with_fit(FitWindow::Fixed { start: 1, end: 8 });
    let estimate = max_lyapunov(&traj, &config).unwrap();
    assert!(
        estimate.exponent > 0.3 && estimate.exponent < 0.6,
        "exponent = {}",
        estimate.exponent
    );
}

#[test]
fn henon_exponent_with_detected_window() {
    let traj = embed(&henon_x(3000), 1, 2).unwrap();
    let estimate = max_lyapunov(&traj, &LyapunovConfig::new(30)).unwrap();
    assert!(
        estimate.exponent > 0.25 && estimate.exponent < 0.65,
        "exponent = {} over steps {}..={}",
        estimate.exponent,
        estimate.region.start,
        estimate.region.end
    );
}

#[test]
fn henon_state_space_trajectory() {
    let data: Vec<f64> = henon(2000).into_iter().flatten().collect();
    let traj = EmbeddedTrajectory::from_points(data, 2).unwrap();
    let config = LyapunovConfig::new(20).with_fit(FitWindow::Fixed { start: 1, end: 8 });
    let estimate = max_lyapunov(&traj, &config).unwrap();
    assert!(
        estimate.exponent > 0.3 && estimate.exponent < 0.6,
        "exponent = {}",
        estimate.exponent
    );
}

#[test]
fn divergence_saturates_at_attractor_size() {
    let entries = divergence_embedded(&henon_x(2000), [2, 3], 1, &LyapunovConfig::new(60)).unwrap();
    for entry in entries {
        let curve = entry.outcome.unwrap();
        assert_eq!(curve.len(), 60);
        let early = curve.mean_log_divergence[0];
        let late = curve.mean_log_divergence[59];
        assert!(late > early + 2.0);
        // The attractor is about 2.6 wide in x.
        assert!(late < 1.5f64.ln() + 1.0);
    }
}

#[test]
fn quasi_periodic_signal_has_no_positive_exponent() {
    let x: Vec<f64> = (0..2000).map(|i| (i as f64 * 0.0731).sin()).collect();
    let traj = embed(&x, 21, 2).unwrap();
    let config = LyapunovConfig::new(60).with_fit(FitWindow::Fixed { start: 0, end: 50 });
    let estimate = max_lyapunov(&traj, &config).unwrap();
    assert!(estimate.exponent.abs() < 0.01, "exponent = {}", estimate.exponent);
}
