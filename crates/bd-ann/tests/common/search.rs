//! Common functions for testing search algorithms.

use bd_ann::{BdTree, Hits, KnnLinear, SearchAlgorithm};

/// Checks that the hits reported by `alg` are sorted, are at the reported
/// distances, and are each within a factor of `1 + epsilon` of the true
/// neighbor of the same rank.
pub fn check_knn<A: SearchAlgorithm<f64>>(tree: &BdTree<f64>, query: &[f64], epsilon: f64, alg: &A) -> Hits<f64> {
    let name = alg.name();
    let k = alg.k().unwrap_or_else(|| unreachable!("{name} is not a k-NN search"));

    let true_hits = KnnLinear(k)
        .search(tree, query)
        .unwrap_or_else(|e| unreachable!("{e}"));
    let pred_hits = alg.search(tree, query).unwrap_or_else(|e| unreachable!("{e}"));

    assert_eq!(
        true_hits.neighbors.len(),
        pred_hits.neighbors.len(),
        "{name}: {:?} vs {:?}",
        true_hits.neighbors,
        pred_hits.neighbors
    );
    check_sorted(&pred_hits, name);

    let max_err = (1.0 + epsilon).powi(2);
    for (i, (&(p, _), &(q, j))) in true_hits.neighbors.iter().zip(&pred_hits.neighbors).enumerate() {
        assert!(
            float_cmp::approx_eq!(f64, q, tree.data().distance_sq(query, j), ulps = 2),
            "{name}: hit {j} is not at the reported distance {q}"
        );
        if epsilon == 0.0 {
            assert!(
                float_cmp::approx_eq!(f64, p, q, ulps = 2),
                "Failed {name} i-th: {i}, p: {p}, q: {q} in \n{:?} vs \n{:?}.",
                true_hits.neighbors,
                pred_hits.neighbors
            );
        } else {
            assert!(
                q <= p * max_err * (1.0 + 1e-12),
                "Failed {name} i-th: {i}, p: {p}, q: {q} with epsilon {epsilon}."
            );
        }
    }

    pred_hits
}

/// Checks that the points reported by a fixed-radius search are exactly the
/// closest points within the radius.
pub fn check_rnn<A: SearchAlgorithm<f64>>(tree: &BdTree<f64>, query: &[f64], sq_radius: f64, alg: &A) {
    let name = alg.name();
    let k = alg.k().unwrap_or_else(|| unreachable!("{name} reports no neighbors"));

    let all = KnnLinear(tree.cardinality())
        .search(tree, query)
        .unwrap_or_else(|e| unreachable!("{e}"));
    let in_range = all.neighbors.iter().filter(|&&(d, _)| d <= sq_radius).collect::<Vec<_>>();

    let pred_hits = alg.search(tree, query).unwrap_or_else(|e| unreachable!("{e}"));
    assert_eq!(pred_hits.in_range, Some(in_range.len()), "{name}");
    assert_eq!(pred_hits.neighbors.len(), in_range.len().min(k), "{name}");
    check_sorted(&pred_hits, name);

    for (&&(p, _), &(q, _)) in in_range.iter().zip(&pred_hits.neighbors) {
        assert!(float_cmp::approx_eq!(f64, p, q, ulps = 2), "{name}: {p} vs {q}");
    }
}

pub fn check_sorted(hits: &Hits<f64>, name: &str) {
    assert!(
        hits.neighbors.windows(2).all(|w| w[0].0 <= w[1].0),
        "{name}: hits are not sorted: {:?}",
        hits.neighbors
    );
}
