//! Depth-first approximate k-nearest-neighbor search.

use crate::{
    core::tree::{Leaf, Shrink, Split},
    BdTree, FloatNumber, Node,
};

use super::{check_k, Hits, QueryContext, SearchAlgorithm};

/// A node that can be searched depth-first for the nearest neighbors of the
/// query in a `QueryContext`.
pub trait Searchable<T: FloatNumber> {
    /// Searches the subtree rooted at this node.
    ///
    /// `box_dist` is a lower bound on the squared distance from the query to
    /// any point in this node's cell.
    fn ann_search(&self, box_dist: T, ctx: &mut QueryContext<'_, T>);
}

impl<T: FloatNumber> Searchable<T> for Node<T> {
    fn ann_search(&self, box_dist: T, ctx: &mut QueryContext<'_, T>) {
        match self {
            Self::Leaf(leaf) => leaf.ann_search(box_dist, ctx),
            Self::Split(split) => split.ann_search(box_dist, ctx),
            Self::Shrink(shrink) => shrink.ann_search(box_dist, ctx),
        }
    }
}

impl<T: FloatNumber> Searchable<T> for Leaf {
    fn ann_search(&self, box_dist: T, ctx: &mut QueryContext<'_, T>) {
        if ctx.over_budget() || ctx.is_pruned(box_dist) {
            return;
        }
        ctx.scan(self);
    }
}

impl<T: FloatNumber> Searchable<T> for Split<T> {
    fn ann_search(&self, box_dist: T, ctx: &mut QueryContext<'_, T>) {
        if ctx.over_budget() || ctx.is_pruned(box_dist) {
            return;
        }

        let (near, far, far_dist) = self.near_far(ctx.query, box_dist);
        near.ann_search(box_dist, ctx);
        if !ctx.is_pruned(far_dist) {
            far.ann_search(far_dist, ctx);
        }
    }
}

impl<T: FloatNumber> Split<T> {
    /// Returns the child on the query's side of the cut, the other child, and
    /// a lower bound on the squared distance from the query to the other
    /// child's cell.
    ///
    /// The bound is found incrementally from `box_dist`, the bound for this
    /// node's cell, by replacing the query's offset from the cell along the
    /// cutting dimension with its offset from the cutting plane.
    pub(crate) fn near_far(&self, query: &[T], box_dist: T) -> (&Node<T>, &Node<T>, T) {
        let q = query[self.cut_dim];
        let cut_diff = q - self.cut_val;
        if cut_diff < T::zero() {
            let box_diff = (self.lo_bound - q).max(T::zero());
            let far_dist = box_dist - box_diff.sq() + cut_diff.sq();
            (self.low.as_ref(), self.high.as_ref(), far_dist)
        } else {
            let box_diff = (q - self.hi_bound).max(T::zero());
            let far_dist = box_dist - box_diff.sq() + cut_diff.sq();
            (self.high.as_ref(), self.low.as_ref(), far_dist)
        }
    }
}

impl<T: FloatNumber> Searchable<T> for Shrink<T> {
    fn ann_search(&self, box_dist: T, ctx: &mut QueryContext<'_, T>) {
        if ctx.over_budget() || ctx.is_pruned(box_dist) {
            return;
        }

        let inner_dist = self.inner_distance(ctx.query);
        if inner_dist <= box_dist {
            self.inner.ann_search(inner_dist, ctx);
            self.outer.ann_search(box_dist, ctx);
        } else {
            self.outer.ann_search(box_dist, ctx);
            self.inner.ann_search(inner_dist, ctx);
        }
    }
}

impl<T: FloatNumber> Shrink<T> {
    /// The sum of the squared distances from the query to each bounding
    /// half-space it lies outside of.
    pub(crate) fn inner_distance(&self, query: &[T]) -> T {
        self.bounds
            .iter()
            .map(|b| b.violation_sq(query))
            .fold(T::zero(), |acc, d| acc + d)
    }
}

/// Depth-first search for the `k` approximate nearest neighbors.
///
/// Each reported neighbor is within a factor of `1 + epsilon` of the distance
/// to the true neighbor of the same rank. A `max_visited` of zero means the
/// search is not limited in the number of points it examines.
#[derive(Debug, Clone, Copy)]
pub struct KnnStandard {
    /// The number of neighbors to find.
    pub k: usize,
    /// The allowed relative error in distance.
    pub epsilon: f64,
    /// The number of points examined beyond which the search stops.
    pub max_visited: usize,
}

impl KnnStandard {
    /// Creates an unlimited search for `k` neighbors with error bound
    /// `epsilon`.
    #[must_use]
    pub const fn new(k: usize, epsilon: f64) -> Self {
        Self {
            k,
            epsilon,
            max_visited: 0,
        }
    }

    /// Limits the search to roughly `max_visited` examined points.
    #[must_use]
    pub const fn with_max_visited(mut self, max_visited: usize) -> Self {
        self.max_visited = max_visited;
        self
    }
}

impl<T: FloatNumber> SearchAlgorithm<T> for KnnStandard {
    fn name(&self) -> &'static str {
        "KnnStandard"
    }

    fn k(&self) -> Option<usize> {
        Some(self.k)
    }

    fn search(&self, tree: &BdTree<T>, query: &[T]) -> Result<Hits<T>, String> {
        check_k(tree, self.k)?;
        let mut ctx = QueryContext::new(tree, query, self.k, self.epsilon, self.max_visited)?;
        if self.k > 0 {
            let box_dist = tree.bbox().distance_sq(query);
            tree.root().ann_search(box_dist, &mut ctx);
        }
        ftlog::trace!(
            "KnnStandard: examined {} of {} points",
            ctx.visited,
            tree.cardinality()
        );
        Ok(ctx.into_hits(None))
    }
}
