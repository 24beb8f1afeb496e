//! Approximate fixed-radius search.

use crate::{BdTree, FloatNumber, Node};

use super::{Hits, QueryContext, SearchAlgorithm};

/// Search for the points within a squared radius of the query.
///
/// Up to `k` of the closest such points are reported, along with the number
/// of points found within the radius. With a positive `epsilon`, cells whose
/// distance from the query is within a factor of `1 + epsilon` of the radius
/// may be skipped, so points near the boundary can be missed. `k` may exceed
/// the number of indexed points, and a `k` of zero only counts.
#[derive(Debug, Clone, Copy)]
pub struct RnnFixed<T> {
    /// The squared search radius.
    pub sq_radius: T,
    /// The maximum number of neighbors to report.
    pub k: usize,
    /// The allowed relative error in distance.
    pub epsilon: f64,
    /// The number of points examined beyond which the search stops.
    pub max_visited: usize,
}

impl<T: FloatNumber> RnnFixed<T> {
    /// Creates an exact, unlimited search for up to `k` points within the
    /// squared radius `sq_radius`.
    #[must_use]
    pub fn new(sq_radius: T, k: usize) -> Self {
        Self {
            sq_radius,
            k,
            epsilon: 0.0,
            max_visited: 0,
        }
    }

    /// Sets the allowed relative error in distance.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Limits the search to roughly `max_visited` examined points.
    #[must_use]
    pub fn with_max_visited(mut self, max_visited: usize) -> Self {
        self.max_visited = max_visited;
        self
    }

    /// Searches the subtree under `node`, returning the number of points
    /// found within the radius.
    fn visit(&self, node: &Node<T>, box_dist: T, ctx: &mut QueryContext<'_, T>) -> usize {
        if ctx.over_budget() || box_dist * ctx.max_err > self.sq_radius {
            return 0;
        }

        match node {
            Node::Leaf(leaf) => ctx.scan_within(leaf, self.sq_radius),
            Node::Split(split) => {
                let (near, far, far_dist) = split.near_far(ctx.query, box_dist);
                self.visit(near, box_dist, ctx) + self.visit(far, far_dist, ctx)
            }
            Node::Shrink(shrink) => {
                let inner_dist = shrink.inner_distance(ctx.query);
                if inner_dist <= box_dist {
                    self.visit(&shrink.inner, inner_dist, ctx) + self.visit(&shrink.outer, box_dist, ctx)
                } else {
                    self.visit(&shrink.outer, box_dist, ctx) + self.visit(&shrink.inner, inner_dist, ctx)
                }
            }
        }
    }
}

impl<T: FloatNumber> SearchAlgorithm<T> for RnnFixed<T> {
    fn name(&self) -> &'static str {
        "RnnFixed"
    }

    fn k(&self) -> Option<usize> {
        Some(self.k)
    }

    fn search(&self, tree: &BdTree<T>, query: &[T]) -> Result<Hits<T>, String> {
        if !self.sq_radius.is_finite() || self.sq_radius < T::zero() {
            return Err(format!(
                "The squared radius must be finite and non-negative, got {}.",
                self.sq_radius
            ));
        }

        let mut ctx = QueryContext::new(tree, query, self.k, self.epsilon, self.max_visited)?;
        let box_dist = tree.bbox().distance_sq(query);
        let in_range = self.visit(tree.root(), box_dist, &mut ctx);

        ftlog::trace!(
            "RnnFixed: found {in_range} points in range after examining {} of {} points",
            ctx.visited,
            tree.cardinality()
        );
        Ok(ctx.into_hits(Some(in_range)))
    }
}
