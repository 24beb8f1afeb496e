//! CLI for approximate nearest-neighbor search with bd-trees.

mod data;
mod logger;
mod rules;

use std::path::PathBuf;

use bd_ann::{BdTree, Hits, KnnLinear, ParSearchAlgorithm, SearchAlgorithm, TreeParams};
use clap::Parser;

/// Builds a tree over a set of points and searches it for the neighbors of
/// each query.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the file of points to index, one point per line.
    #[arg(short('d'), long)]
    data: PathBuf,

    /// Path to the file of query points, one point per line.
    #[arg(short('q'), long)]
    queries: PathBuf,

    /// The number of neighbors to find.
    #[arg(short('k'), long, default_value = "1")]
    k: usize,

    /// The allowed relative error in distance.
    #[arg(short('e'), long, default_value = "0.0")]
    epsilon: f64,

    /// The number of points examined beyond which a search stops. Zero means
    /// no limit.
    #[arg(short('m'), long, default_value = "0")]
    max_visited: usize,

    /// The maximum number of points in a leaf.
    #[arg(short('b'), long, default_value = "1")]
    bucket_size: usize,

    /// The rule for choosing cutting planes.
    #[arg(long, default_value = "sliding-midpoint")]
    split_rule: rules::Split,

    /// The rule for shrinking cells.
    #[arg(long, default_value = "suggest")]
    shrink_rule: rules::Shrink,

    /// The search algorithm.
    #[arg(short('a'), long, default_value = "standard")]
    algorithm: rules::Algorithm,

    /// Report up to `k` points within this radius instead of the `k` nearest.
    #[arg(short('r'), long)]
    radius: Option<f64>,

    /// Whether to compare the results against a linear scan.
    #[arg(long)]
    validate: bool,

    /// The name of the log file.
    #[arg(long, default_value = "bd-ann")]
    log_name: String,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let (_guard, log_path) = logger::configure_logger(&args.log_name, ftlog::LevelFilter::Info)?;
    eprintln!("Log file: {log_path:?}");
    ftlog::info!("{args:?}");

    let points = data::read_points(&args.data)?;
    let queries = data::read_points(&args.queries)?;
    ftlog::info!("Read {} points and {} queries.", points.len(), queries.len());

    let params = TreeParams::default()
        .with_bucket_size(args.bucket_size)
        .with_split_rule(args.split_rule.into())
        .with_shrink_rule(args.shrink_rule.into());
    let start = std::time::Instant::now();
    let tree = BdTree::new(points, params)?;
    ftlog::info!(
        "Built a tree of height {} over {} points in {:.3e} seconds.",
        tree.root().height(),
        tree.cardinality(),
        start.elapsed().as_secs_f64()
    );

    let alg = args
        .algorithm
        .build(args.k, args.epsilon, args.max_visited, args.radius);
    let start = std::time::Instant::now();
    let results = alg.par_batch_search(&tree, &queries)?;
    let elapsed = start.elapsed().as_secs_f64();
    let visited = results.iter().map(|hits| hits.visited).sum::<usize>();
    ftlog::info!(
        "{} answered {} queries in {elapsed:.3e} seconds, examining {visited} points.",
        alg.name(),
        queries.len()
    );

    for (i, hits) in results.iter().enumerate() {
        println!("{}", format_hits(i, hits));
    }

    if args.validate && args.radius.is_none() {
        let truth = KnnLinear(args.k).par_batch_search(&tree, &queries)?;
        let error = mean_relative_error(&truth, &results);
        ftlog::info!("Mean relative distance error: {error:.6}");
        eprintln!("Mean relative distance error: {error:.6}");
    }

    Ok(())
}

/// Formats the hits of one query as `index:distance` pairs.
fn format_hits(query: usize, hits: &Hits<f64>) -> String {
    let pairs = hits
        .indices()
        .into_iter()
        .zip(hits.distances())
        .map(|(i, d)| format!("{i}:{d}"))
        .collect::<Vec<_>>()
        .join(" ");
    match hits.in_range {
        Some(n) => format!("{query} ({n} in range): {pairs}"),
        None => format!("{query}: {pairs}"),
    }
}

/// The mean, over all queries and ranks, of the relative excess of each
/// reported distance over the true distance of the same rank.
#[allow(clippy::cast_precision_loss)]
fn mean_relative_error(truth: &[Hits<f64>], results: &[Hits<f64>]) -> f64 {
    let errors = truth
        .iter()
        .zip(results)
        .flat_map(|(t, r)| t.distances().into_iter().zip(r.distances()))
        .filter(|&(t, _)| t > 0.0)
        .map(|(t, r)| (r - t) / t)
        .collect::<Vec<_>>();
    if errors.is_empty() {
        0.0
    } else {
        errors.iter().sum::<f64>() / errors.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use bd_ann::Hits;

    use super::{format_hits, mean_relative_error};

    #[test]
    fn format() {
        let hits = Hits {
            neighbors: vec![(0.0, 3), (4.0, 1)],
            visited: 2,
            in_range: None,
        };
        assert_eq!(format_hits(0, &hits), "0: 3:0 1:2");

        let hits = Hits { in_range: Some(5), ..hits };
        assert_eq!(format_hits(7, &hits), "7 (5 in range): 3:0 1:2");
    }

    #[test]
    fn relative_error() {
        let truth = vec![Hits {
            neighbors: vec![(0.0, 0), (1.0, 1), (4.0, 2)],
            visited: 3,
            in_range: None,
        }];
        let results = vec![Hits {
            neighbors: vec![(0.0, 0), (4.0, 2), (4.0, 3)],
            visited: 3,
            in_range: None,
        }];
        // Ranks with a true distance of zero are skipped.
        let error = mean_relative_error(&truth, &results);
        assert!((error - 0.5).abs() < 1e-12);
    }
}
