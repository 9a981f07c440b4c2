//! Integration tests for delay embedding of scalar and vector series.

use approx::assert_abs_diff_eq;
use chaoscope_embed::{EmbedError, EmbeddedTrajectory, ErrorKind, TimeSeries, embed};

#[test]
fn point_count_matches_formula() {
    let x: Vec<f64> = (0..500).map(|i| (i as f64 * 0.05).sin()).collect();
    for tau in 1..6 {
        for dim in 1..8 {
            let traj = embed(&x, tau, dim).unwrap();
            assert_eq!(traj.len(), 500 - (dim - 1) * tau);
            assert_eq!(traj.dim(), dim);
        }
    }
}

#[test]
fn every_coordinate_is_a_delayed_sample() {
    let x: Vec<f64> = (0..50).map(|i| (i * i) as f64).collect();
    let traj = embed(&x, 4, 5).unwrap();
    for (i, p) in traj.points().enumerate() {
        for (j, &v) in p.iter().enumerate() {
            assert_abs_diff_eq!(v, x[i + j * 4]);
        }
    }
}

#[test]
fn vector_series_concatenates_channels() {
    // Two channels: t and -t.
    let data: Vec<f64> = (0..6).flat_map(|t| [t as f64, -(t as f64)]).collect();
    let ts = TimeSeries::from_rows(data, 2).unwrap();
    let traj = ts.embed(2, 2).unwrap();
    assert_eq!(traj.dim(), 4);
    assert_eq!(traj.len(), 4);
    assert_eq!(traj.point(1), &[1.0, -1.0, 3.0, -3.0]);
}

#[test]
fn scalar_series_embed_matches_free_function() {
    let x: Vec<f64> = (0..30).map(|i| i as f64 * 0.5).collect();
    let ts = TimeSeries::new(x.clone()).unwrap();
    assert_eq!(ts.embed(3, 4).unwrap(), embed(&x, 3, 4).unwrap());
}

#[test]
fn too_short_fails_fast() {
    let err = embed(&[1.0, 2.0], 1, 3).unwrap_err();
    assert_eq!(err, EmbedError::SeriesTooShort { len: 2, required: 3 });
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn reconstructed_trajectory_passes_through() {
    let traj = EmbeddedTrajectory::from_points(vec![0.0, 0.0, 1.0, 1.0, 2.0, 0.5], 2).unwrap();
    assert_eq!(traj.len(), 3);
    assert_eq!(traj.points().nth(2).unwrap(), &[2.0, 0.5]);
}
