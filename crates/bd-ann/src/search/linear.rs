//! k-NN search using a linear scan of the indexed points.

use rayon::prelude::*;

use crate::{BdTree, FloatNumber, MinK};

use super::{check_k, context::check_query, Hits, ParSearchAlgorithm, SearchAlgorithm};

/// Exact k-NN search using a linear scan of the indexed points.
///
/// This ignores the tree and serves as ground truth for the other
/// algorithms.
#[derive(Debug, Clone, Copy)]
pub struct KnnLinear(pub usize);

impl<T: FloatNumber> SearchAlgorithm<T> for KnnLinear {
    fn name(&self) -> &'static str {
        "KnnLinear"
    }

    fn k(&self) -> Option<usize> {
        Some(self.0)
    }

    fn search(&self, tree: &BdTree<T>, query: &[T]) -> Result<Hits<T>, String> {
        check_k(tree, self.0)?;
        check_query(tree, query, 0.0)?;
        let data = tree.data();
        let hits = (0..data.cardinality()).fold(MinK::new(self.0), |mut hits, i| {
            hits.insert(data.distance_sq(query, i), i);
            hits
        });
        Ok(Hits::from_min_k(hits, data.cardinality()))
    }
}

impl<T: FloatNumber> ParSearchAlgorithm<T> for KnnLinear {
    fn par_search(&self, tree: &BdTree<T>, query: &[T]) -> Result<Hits<T>, String> {
        check_k(tree, self.0)?;
        check_query(tree, query, 0.0)?;
        let data = tree.data();
        let hits = (0..data.cardinality())
            .into_par_iter()
            .fold(
                || MinK::new(self.0),
                |mut hits, i| {
                    hits.insert(data.distance_sq(query, i), i);
                    hits
                },
            )
            .reduce(
                || MinK::new(self.0),
                |mut a, b| {
                    a.merge(b);
                    a
                },
            );
        Ok(Hits::from_min_k(hits, data.cardinality()))
    }
}
