//! Deterministic ordering of neighbor candidates.

use crate::result::Neighbor;

/// Sorts `(distance, index)` candidates ascending and writes the first `k`
/// into `out` (all of them when `k` is `None`).
///
/// Ties in distance are broken by ascending index so the result does not
/// depend on grid traversal order.
pub(crate) fn sort_and_take(pairs: &mut [(f64, usize)], k: Option<usize>, out: &mut Vec<Neighbor>) {
    pairs.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    let take = k.map_or(pairs.len(), |k| k.min(pairs.len()));
    out.clear();
    out.extend(pairs[..take].iter().map(|&(distance, index)| Neighbor { index, distance }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pairs: &[(f64, usize)], k: Option<usize>) -> Vec<Neighbor> {
        let mut pairs = pairs.to_vec();
        let mut out = Vec::new();
        sort_and_take(&mut pairs, k, &mut out);
        out
    }

    #[test]
    fn ascending_distance() {
        let out = run(&[(3.0, 0), (1.0, 5), (2.0, 2)], Some(2));
        assert_eq!(out.iter().map(|n| n.index).collect::<Vec<_>>(), vec![5, 2]);
    }

    #[test]
    fn ties_by_index() {
        let out = run(&[(1.0, 9), (1.0, 4), (1.0, 7), (0.5, 8)], None);
        assert_eq!(out.iter().map(|n| n.index).collect::<Vec<_>>(), vec![8, 4, 7, 9]);
    }

    #[test]
    fn buffer_is_cleared() {
        let mut out = vec![Neighbor {
            index: 99,
            distance: 0.0,
        }];
        let mut pairs = vec![(2.0, 1)];
        sort_and_take(&mut pairs, Some(5), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].index, 1);
    }
}
