//! Data generation utilities for testing.

use rand::prelude::*;

/// Four points in the plane, three of them close together.
pub fn corners() -> Vec<Vec<f64>> {
    vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0]]
}

pub fn grid(max: i32) -> Vec<Vec<f32>> {
    (-max..=max)
        .flat_map(|x| (-max..=max).map(move |y| vec![x as f32, y as f32]))
        .collect()
}

pub fn uniform(car: usize, dim: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..car)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

/// Tight clusters scattered over a wide range, the layout on which shrinking
/// pays off.
pub fn clustered(car: usize, dim: usize, n_clusters: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let centers = (0..n_clusters)
        .map(|_| (0..dim).map(|_| rng.gen_range(-100.0..100.0)).collect::<Vec<f64>>())
        .collect::<Vec<_>>();
    (0..car)
        .map(|i| {
            centers[i % n_clusters]
                .iter()
                .map(|&c| c + rng.gen_range(-0.01..0.01))
                .collect()
        })
        .collect()
}

pub fn queries(n: usize, dim: usize, spread: f64, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..dim).map(|_| rng.gen_range(-spread..spread)).collect())
        .collect()
}
