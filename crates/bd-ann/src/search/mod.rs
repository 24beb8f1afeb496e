//! Nearest-neighbor search algorithms over a `BdTree`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{BdTree, FloatNumber, MinK};

mod context;
mod fixed_radius;
mod linear;
mod priority;
mod standard;

pub use context::QueryContext;
pub use fixed_radius::RnnFixed;
pub use linear::KnnLinear;
pub use priority::KnnPriority;
pub use standard::{KnnStandard, Searchable};

/// The result of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hits<T> {
    /// The squared distances and indices of the neighbors found, in
    /// ascending order of distance.
    pub neighbors: Vec<(T, usize)>,
    /// The number of points whose distance from the query was examined.
    pub visited: usize,
    /// For fixed-radius search, the number of points found within the radius.
    pub in_range: Option<usize>,
}

impl<T: FloatNumber> Hits<T> {
    /// Collects the entries of `hits` after examining `visited` points.
    pub(crate) fn from_min_k(hits: MinK<T>, visited: usize) -> Self {
        Self {
            neighbors: hits.items().collect(),
            visited,
            in_range: None,
        }
    }

    /// Returns the indices of the neighbors, closest first.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.neighbors.iter().map(|&(_, i)| i).collect()
    }

    /// Returns the Euclidean distances of the neighbors, closest first.
    #[must_use]
    pub fn distances(&self) -> Vec<T> {
        self.neighbors.iter().map(|&(d, _)| d.sqrt()).collect()
    }
}

/// Common trait for search algorithms over a `BdTree`.
#[allow(clippy::module_name_repetitions)]
pub trait SearchAlgorithm<T: FloatNumber> {
    /// Return the name of the search algorithm.
    fn name(&self) -> &'static str;

    /// Get the value of k if it is a k-NN search algorithm.
    fn k(&self) -> Option<usize> {
        None
    }

    /// Perform a search for `query` in `tree`.
    ///
    /// # Errors
    ///
    /// * If the query does not have the dimension of the tree's points.
    /// * If the query has a non-finite coordinate.
    /// * If the algorithm's parameters are invalid for the tree.
    fn search(&self, tree: &BdTree<T>, query: &[T]) -> Result<Hits<T>, String>;

    /// Batched version of `SearchAlgorithm::search`.
    ///
    /// # Errors
    ///
    /// The first error from any of the queries.
    fn batch_search(&self, tree: &BdTree<T>, queries: &[Vec<T>]) -> Result<Vec<Hits<T>>, String> {
        queries.iter().map(|query| self.search(tree, query)).collect()
    }
}

/// Parallel version of [`SearchAlgorithm`](crate::search::SearchAlgorithm).
///
/// Each query is searched on a single thread by default. Queries of a batch
/// are spread over the rayon thread pool.
pub trait ParSearchAlgorithm<T: FloatNumber>: SearchAlgorithm<T> + Send + Sync {
    /// Parallel version of [`SearchAlgorithm::search`](crate::search::SearchAlgorithm::search).
    ///
    /// # Errors
    ///
    /// See [`SearchAlgorithm::search`](crate::search::SearchAlgorithm::search).
    fn par_search(&self, tree: &BdTree<T>, query: &[T]) -> Result<Hits<T>, String> {
        self.search(tree, query)
    }

    /// Parallel version of [`SearchAlgorithm::batch_search`](crate::search::SearchAlgorithm::batch_search).
    ///
    /// # Errors
    ///
    /// An error from any of the queries.
    fn par_batch_search(&self, tree: &BdTree<T>, queries: &[Vec<T>]) -> Result<Vec<Hits<T>>, String> {
        queries.par_iter().map(|query| self.par_search(tree, query)).collect()
    }
}

impl<T: FloatNumber> ParSearchAlgorithm<T> for KnnStandard {}

impl<T: FloatNumber> ParSearchAlgorithm<T> for KnnPriority {}

impl<T: FloatNumber> ParSearchAlgorithm<T> for RnnFixed<T> {}

/// A blanket implementation of `SearchAlgorithm` for `Box<dyn ParSearchAlgorithm>`.
impl<T: FloatNumber> SearchAlgorithm<T> for Box<dyn ParSearchAlgorithm<T>> {
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn k(&self) -> Option<usize> {
        self.as_ref().k()
    }

    fn search(&self, tree: &BdTree<T>, query: &[T]) -> Result<Hits<T>, String> {
        self.as_ref().search(tree, query)
    }
}

/// A blanket implementation of `ParSearchAlgorithm` for `Box<dyn ParSearchAlgorithm>`.
impl<T: FloatNumber> ParSearchAlgorithm<T> for Box<dyn ParSearchAlgorithm<T>> {
    fn par_search(&self, tree: &BdTree<T>, query: &[T]) -> Result<Hits<T>, String> {
        self.as_ref().par_search(tree, query)
    }
}

/// Checks that a k-NN search for `k` neighbors can be run on `tree`.
fn check_k<T: FloatNumber>(tree: &BdTree<T>, k: usize) -> Result<(), String> {
    if k > tree.cardinality() {
        Err(format!(
            "Cannot search for {k} neighbors among {} points.",
            tree.cardinality()
        ))
    } else {
        Ok(())
    }
}

impl<T: FloatNumber> BdTree<T> {
    /// Finds the `k` approximate nearest neighbors of `query`.
    ///
    /// Returns the squared distances and indices of the neighbors in
    /// ascending order of distance. The `i`-th reported distance is within a
    /// factor of `1 + epsilon` of the distance to the true `i`-th nearest
    /// neighbor.
    ///
    /// # Errors
    ///
    /// * If `k` exceeds the number of indexed points.
    /// * If the query does not have the dimension of the indexed points.
    /// * If the query has a non-finite coordinate.
    /// * If `epsilon` is negative or not finite.
    pub fn search(&self, query: &[T], k: usize, epsilon: f64) -> Result<Vec<(T, usize)>, String> {
        self.search_with_budget(query, k, epsilon, 0)
    }

    /// Like `search`, but stops after examining roughly `max_visited` points.
    /// A `max_visited` of zero means no limit.
    ///
    /// When the search stops early, the error bound no longer holds and fewer
    /// than `k` neighbors may be returned.
    ///
    /// # Errors
    ///
    /// See `search`.
    pub fn search_with_budget(
        &self,
        query: &[T],
        k: usize,
        epsilon: f64,
        max_visited: usize,
    ) -> Result<Vec<(T, usize)>, String> {
        KnnStandard::new(k, epsilon)
            .with_max_visited(max_visited)
            .search(self, query)
            .map(|hits| hits.neighbors)
    }
}
