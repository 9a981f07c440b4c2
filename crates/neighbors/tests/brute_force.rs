//! Grid queries agree with exhaustive search on random trajectories.

use chaoscope_embed::{EmbeddedTrajectory, embed};
use chaoscope_neighbors::{Metric, NeighborConfig, NeighborIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_trajectory(n: usize, dim: usize, seed: u64) -> EmbeddedTrajectory {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f64> = (0..n * dim).map(|_| rng.random::<f64>() * 10.0 - 5.0).collect();
    EmbeddedTrajectory::from_points(data, dim).unwrap()
}

fn brute_knn(traj: &EmbeddedTrajectory, metric: Metric, i: usize, k: usize, w: usize) -> Vec<usize> {
    let mut all: Vec<(f64, usize)> = (0..traj.len())
        .filter(|&j| j.abs_diff(i) > w)
        .map(|j| (metric.distance(traj.point(i), traj.point(j)), j))
        .collect();
    all.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    all.into_iter().take(k).map(|(_, j)| j).collect()
}

#[test]
fn knn_matches_brute_force_for_every_metric() {
    for (dim, seed) in [(1usize, 1u64), (2, 2), (4, 3)] {
        let traj = random_trajectory(400, dim, seed);
        for metric in [Metric::Euclidean, Metric::Chebyshev, Metric::Manhattan] {
            let index = NeighborIndex::build(&traj, &NeighborConfig::new(metric)).unwrap();
            for i in (0..traj.len()).step_by(37) {
                let got: Vec<usize> = index.query(i, 5, 7).unwrap().iter().map(|n| n.index).collect();
                assert_eq!(got, brute_knn(&traj, metric, i, 5, 7), "dim {dim}, {metric}, point {i}");
            }
        }
    }
}

#[test]
fn results_never_violate_theiler_window() {
    let x: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.05).sin()).collect();
    let traj = embed(&x, 8, 3).unwrap();
    let index = NeighborIndex::build(&traj, &NeighborConfig::default()).unwrap();
    for w in [0usize, 5, 40] {
        for i in (0..traj.len()).step_by(53) {
            for n in index.query(i, 8, w).unwrap() {
                assert_ne!(n.index, i);
                assert!(n.index.abs_diff(i) > w);
            }
        }
    }
}

#[test]
fn radius_query_matches_brute_force() {
    let traj = random_trajectory(300, 2, 11);
    let index = NeighborIndex::build(&traj, &NeighborConfig::new(Metric::Euclidean)).unwrap();
    for i in [0usize, 77, 299] {
        let got: Vec<usize> = index.query_radius(i, 1.3, 2).unwrap().iter().map(|n| n.index).collect();
        let mut want: Vec<(f64, usize)> = (0..traj.len())
            .filter(|&j| j.abs_diff(i) > 2)
            .map(|j| (index.distance(i, j), j))
            .filter(|&(d, _)| d <= 1.3)
            .collect();
        want.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        assert_eq!(got, want.into_iter().map(|(_, j)| j).collect::<Vec<_>>());
    }
}

#[test]
fn pair_count_at_full_extent_is_all_admissible_pairs() {
    let traj = random_trajectory(120, 3, 5);
    let index = NeighborIndex::build(&traj, &NeighborConfig::default()).unwrap();
    let w = 6;
    let mut count = 0usize;
    index
        .for_each_pair_within(index.diameter(), w, |_, _, _| count += 1)
        .unwrap();
    let m = traj.len();
    assert_eq!(count, (m - w - 1) * (m - w) / 2);
}
