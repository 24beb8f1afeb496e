//! Benchmarks for k-NN search on uniform and clustered data.

use bd_ann::{BdTree, KnnLinear, KnnPriority, KnnStandard, ParSearchAlgorithm, SearchAlgorithm, TreeParams};
use criterion::*;
use rand::prelude::*;

fn uniform(car: usize, dim: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    (0..car)
        .map(|_| (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

fn clustered(car: usize, dim: usize, n_clusters: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let centers = uniform(n_clusters, dim, rng);
    (0..car)
        .map(|i| {
            centers[i % n_clusters]
                .iter()
                .map(|&c| 100.0f32.mul_add(c, rng.gen_range(-0.01..0.01)))
                .collect()
        })
        .collect()
}

fn run_search(c: &mut Criterion, name: &str, points: Vec<Vec<f32>>, queries: &[Vec<f32>], ks: &[usize]) {
    let trees = [("kd", TreeParams::kd()), ("bd", TreeParams::bd())]
        .into_iter()
        .map(|(tree_name, params)| {
            let tree = BdTree::new(points.clone(), params.with_bucket_size(8)).unwrap_or_else(|e| unreachable!("{e}"));
            (tree_name, tree)
        })
        .collect::<Vec<_>>();

    for &k in ks {
        let algs: Vec<Box<dyn ParSearchAlgorithm<f32>>> = vec![
            Box::new(KnnLinear(k)),
            Box::new(KnnStandard::new(k, 0.0)),
            Box::new(KnnStandard::new(k, 0.5)),
            Box::new(KnnPriority::new(k, 0.5)),
            Box::new(KnnPriority::new(k, 0.5).with_max_visited(100)),
        ];

        let mut group = c.benchmark_group(format!("{name}-k{k}"));
        group
            .sample_size(10)
            .sampling_mode(SamplingMode::Flat)
            .throughput(Throughput::Elements(queries.len() as u64));

        for (tree_name, tree) in &trees {
            for (i, alg) in algs.iter().enumerate() {
                group.bench_with_input(BenchmarkId::new(format!("{tree_name}-{}", alg.name()), i), &i, |b, _| {
                    b.iter_with_large_drop(|| alg.batch_search(tree, queries));
                });
            }
        }

        group.finish();
    }
}

fn knn_search(c: &mut Criterion) {
    let seed = 42;
    let mut rng = StdRng::seed_from_u64(seed);
    let cardinality = 100_000;
    let dimensionality = 10;
    let num_queries = 100;
    let ks = [1, 10, 100];

    let queries = uniform(num_queries, dimensionality, &mut rng);
    let points = uniform(cardinality, dimensionality, &mut rng);
    run_search(c, "uniform", points, &queries, &ks);

    let queries = queries
        .into_iter()
        .map(|q| q.into_iter().map(|c| c * 100.0).collect())
        .collect::<Vec<_>>();
    let points = clustered(cardinality, dimensionality, 50, &mut rng);
    run_search(c, "clustered", points, &queries, &ks);
}

criterion_group!(benches, knn_search);
criterion_main!(benches);
