//! The per-query state shared by every node visited during one search.

use crate::{core::tree::Leaf, BdTree, FloatNumber, MinK, PointSet};

use super::Hits;

/// The state of one query, passed by reference through the whole traversal.
///
/// A context is created fresh for every query and never outlives it, so any
/// number of queries may search the same tree concurrently.
#[derive(Debug)]
pub struct QueryContext<'a, T> {
    /// The query point.
    pub(crate) query: &'a [T],
    /// The squared error factor, `(1 + ε)^2`.
    pub(crate) max_err: T,
    /// The indexed points.
    pub(crate) data: &'a PointSet<T>,
    /// The tree's index array, of which leaves own contiguous ranges.
    pub(crate) indices: &'a [usize],
    /// The best candidates found so far.
    pub(crate) hits: MinK<T>,
    /// The number of points examined so far.
    pub(crate) visited: usize,
    /// The number of points examined beyond which the search stops. Zero
    /// means no limit.
    pub(crate) max_visited: usize,
}

impl<'a, T: FloatNumber> QueryContext<'a, T> {
    /// Creates a context for searching `tree` around `query` for `k` hits
    /// within a relative error of `epsilon`.
    ///
    /// # Errors
    ///
    /// * If the query does not have the dimension of the tree's points.
    /// * If the query has a non-finite coordinate.
    /// * If `epsilon` is negative or not finite.
    pub fn new(tree: &'a BdTree<T>, query: &'a [T], k: usize, epsilon: f64, max_visited: usize) -> Result<Self, String> {
        check_query(tree, query, epsilon)?;

        Ok(Self {
            query,
            max_err: T::from_f64((1.0 + epsilon).powi(2)),
            data: tree.data(),
            indices: tree.indices(),
            hits: MinK::new(k),
            visited: 0,
            max_visited,
        })
    }

    /// Returns whether the search has examined more points than allowed.
    pub(crate) const fn over_budget(&self) -> bool {
        self.max_visited != 0 && self.visited > self.max_visited
    }

    /// Returns whether a region at squared distance `box_dist` cannot hold a
    /// point closer than the current worst hit, allowing for the error bound.
    ///
    /// Nothing is pruned before `k` hits are held, even if `box_dist`
    /// overflowed to infinity.
    pub(crate) fn is_pruned(&self, box_dist: T) -> bool {
        self.hits.is_full() && box_dist * self.max_err >= self.hits.worst_key()
    }

    /// Examines every point in a leaf, keeping the closest in `hits`.
    pub(crate) fn scan(&mut self, leaf: &Leaf) {
        let mut min_dist = self.hits.worst_key();
        for &i in &self.indices[leaf.range()] {
            if let Some(d) = self.data.distance_sq_within(self.query, i, min_dist) {
                self.hits.insert(d, i);
                min_dist = self.hits.worst_key();
            }
        }
        self.visited += leaf.cardinality();
    }

    /// Examines every point in a leaf, keeping in `hits` the closest of those
    /// within `sq_radius` of the query. Returns the number of points within
    /// `sq_radius`.
    pub(crate) fn scan_within(&mut self, leaf: &Leaf, sq_radius: T) -> usize {
        let mut in_range = 0;
        for &i in &self.indices[leaf.range()] {
            if let Some(d) = self.data.distance_sq_within(self.query, i, sq_radius) {
                self.hits.insert(d, i);
                in_range += 1;
            }
        }
        self.visited += leaf.cardinality();
        in_range
    }

    /// Consumes the context and returns the hits in ascending order of
    /// distance.
    #[must_use]
    pub fn into_hits(self, in_range: Option<usize>) -> Hits<T> {
        Hits {
            in_range,
            ..Hits::from_min_k(self.hits, self.visited)
        }
    }
}

/// Checks that `query` and `epsilon` are valid for searching `tree`.
pub(crate) fn check_query<T: FloatNumber>(tree: &BdTree<T>, query: &[T], epsilon: f64) -> Result<(), String> {
    if query.len() != tree.dim() {
        return Err(format!(
            "The query has dimension {} but the tree has dimension {}.",
            query.len(),
            tree.dim()
        ));
    }
    if let Some(c) = query.iter().find(|c| !c.is_finite()) {
        return Err(format!("The query has a non-finite coordinate {c}."));
    }
    if !epsilon.is_finite() || epsilon < 0.0 {
        return Err(format!("The error bound must be finite and non-negative, got {epsilon}."));
    }
    Ok(())
}
