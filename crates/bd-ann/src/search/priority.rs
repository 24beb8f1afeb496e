//! Best-first approximate k-nearest-neighbor search.

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::{BdTree, FloatNumber, Node};

use super::{check_k, Hits, QueryContext, SearchAlgorithm};

/// A subtree waiting to be searched, ordered by the lower bound on its
/// squared distance from the query. Incomparable bounds are treated as
/// greater than any other.
struct Candidate<'a, T: PartialOrd>(&'a Node<T>, T);

impl<T: PartialOrd> PartialEq for Candidate<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl<T: PartialOrd> Eq for Candidate<'_, T> {}

impl<T: PartialOrd> PartialOrd for Candidate<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialOrd> Ord for Candidate<'_, T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.1.partial_cmp(&other.1).unwrap_or(core::cmp::Ordering::Greater)
    }
}

/// Best-first search for the `k` approximate nearest neighbors.
///
/// Cells are searched in increasing order of their distance from the query,
/// which usually examines fewer points than `KnnStandard` when `epsilon` is
/// large or the search is limited by `max_visited`. The error guarantee is
/// the same.
#[derive(Debug, Clone, Copy)]
pub struct KnnPriority {
    /// The number of neighbors to find.
    pub k: usize,
    /// The allowed relative error in distance.
    pub epsilon: f64,
    /// The number of points examined beyond which the search stops.
    pub max_visited: usize,
}

impl KnnPriority {
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

impl<T: FloatNumber> SearchAlgorithm<T> for KnnPriority {
    fn name(&self) -> &'static str {
        "KnnPriority"
    }

    fn k(&self) -> Option<usize> {
        Some(self.k)
    }

    fn search(&self, tree: &BdTree<T>, query: &[T]) -> Result<Hits<T>, String> {
        check_k(tree, self.k)?;
        let mut ctx = QueryContext::new(tree, query, self.k, self.epsilon, self.max_visited)?;
        if self.k == 0 {
            return Ok(ctx.into_hits(None));
        }

        let mut queue = BinaryHeap::new();
        queue.push(Reverse(Candidate(tree.root(), tree.bbox().distance_sq(query))));

        while let Some(Reverse(Candidate(node, box_dist))) = queue.pop() {
            if ctx.over_budget() || ctx.is_pruned(box_dist) {
                break;
            }
            descend(node, box_dist, &mut ctx, &mut queue);
        }

        ftlog::trace!(
            "KnnPriority: examined {} of {} points with {} cells left in the queue",
            ctx.visited,
            tree.cardinality(),
            queue.len()
        );
        Ok(ctx.into_hits(None))
    }
}

/// Follows the closer child from `node` down to a leaf, queueing every
/// farther child on the way, and scans the leaf.
fn descend<'a, T: FloatNumber>(
    mut node: &'a Node<T>,
    mut box_dist: T,
    ctx: &mut QueryContext<'_, T>,
    queue: &mut BinaryHeap<Reverse<Candidate<'a, T>>>,
) {
    loop {
        match node {
            Node::Leaf(leaf) => {
                ctx.scan(leaf);
                return;
            }
            Node::Split(split) => {
                let (near, far, far_dist) = split.near_far(ctx.query, box_dist);
                enqueue(queue, far, far_dist);
                node = near;
            }
            Node::Shrink(shrink) => {
                let inner_dist = shrink.inner_distance(ctx.query);
                if inner_dist <= box_dist {
                    enqueue(queue, shrink.outer.as_ref(), box_dist);
                    node = shrink.inner.as_ref();
                    box_dist = inner_dist;
                } else {
                    enqueue(queue, shrink.inner.as_ref(), inner_dist);
                    node = shrink.outer.as_ref();
                }
            }
        }
    }
}

/// Queues `node` at squared distance `box_dist`. The trivial leaf is never
/// queued.
fn enqueue<'a, T: FloatNumber>(queue: &mut BinaryHeap<Reverse<Candidate<'a, T>>>, node: &'a Node<T>, box_dist: T) {
    if !matches!(node, Node::Leaf(leaf) if leaf.is_trivial()) {
        queue.push(Reverse(Candidate(node, box_dist)));
    }
}

#[cfg(test)]
mod tests {
    use std::{cmp::Reverse, collections::BinaryHeap};

    use crate::{
        core::tree::{Leaf, Shrink},
        BdTree, HalfSpace, KnnLinear, KnnStandard, Node, QueryContext, SearchAlgorithm, Side, TreeParams,
    };

    use super::{descend, KnnPriority};

    fn grid() -> Result<BdTree<f32>, String> {
        let points = (0..10)
            .flat_map(|x| (0..10).map(move |y| vec![x as f32, y as f32]))
            .collect();
        BdTree::new(points, TreeParams::default().with_bucket_size(3))
    }

    #[test]
    fn matches_standard() -> Result<(), String> {
        let tree = grid()?;
        for query in [[4.4, 4.4], [-3.0, 12.0], [9.0, 0.0], [5.5, 5.1]] {
            let standard = KnnStandard::new(5, 0.0).search(&tree, &query)?;
            let priority = KnnPriority::new(5, 0.0).search(&tree, &query)?;
            let distances = |hits: &crate::Hits<f32>| hits.neighbors.iter().map(|&(d, _)| d).collect::<Vec<_>>();
            assert_eq!(distances(&standard), distances(&priority));
        }
        Ok(())
    }

    #[test]
    fn exact_match() -> Result<(), String> {
        let tree = grid()?;
        let hits = KnnPriority::new(1, 0.0).search(&tree, &[3.0, 7.0])?;
        assert_eq!(hits.neighbors, vec![(0.0, 37)]);
        Ok(())
    }

    #[test]
    fn errors() -> Result<(), String> {
        let tree = grid()?;
        assert!(KnnPriority::new(101, 0.0).search(&tree, &[3.0, 7.0]).is_err());
        assert!(KnnPriority::new(1, 0.0).search(&tree, &[3.0]).is_err());
        Ok(())
    }

    #[test]
    fn overflowing_distances() -> Result<(), String> {
        let tree = BdTree::new(vec![vec![-1e19_f32], vec![-9e18]], TreeParams::default())?;
        let query = [1e19_f32];

        for k in 1..=2 {
            let hits = KnnPriority::new(k, 0.0).search(&tree, &query)?;
            let linear = KnnLinear(k).search(&tree, &query)?;
            assert_eq!(hits.neighbors.len(), k);
            assert_eq!(hits.neighbors.len(), linear.neighbors.len());
        }
        assert_eq!(tree.search(&query, 1, 0.0)?.len(), 1);
        Ok(())
    }

    #[test]
    fn skips_trivial_shrink_children() -> Result<(), String> {
        let tree = BdTree::new(vec![vec![0.0_f32, 0.0], vec![1.0, 1.0]], TreeParams::default())?;
        let leaf = |offset, cardinality| Box::new(Node::Leaf(Leaf { offset, cardinality }));
        let bounds = vec![HalfSpace::new(0, 2.0, Side::Low)];

        // The query is inside the inner box, so only the outer child could be queued.
        let trivial_outer = Node::Shrink(Shrink {
            bounds: bounds.clone(),
            inner: leaf(0, 2),
            outer: leaf(2, 0),
        });
        let query = [0.5, 0.5];
        let mut ctx = QueryContext::new(&tree, &query, 1, 0.0, 0)?;
        let mut queue = BinaryHeap::new();
        descend(&trivial_outer, 0.0, &mut ctx, &mut queue);
        assert!(queue.is_empty());
        assert_eq!(ctx.visited, 2);

        // The query is outside the inner box, so only the inner child could be queued.
        let trivial_inner = Node::Shrink(Shrink {
            bounds,
            inner: leaf(2, 0),
            outer: leaf(0, 2),
        });
        let query = [5.0, 0.5];
        let mut ctx = QueryContext::new(&tree, &query, 1, 0.0, 0)?;
        let mut queue: BinaryHeap<Reverse<_>> = BinaryHeap::new();
        descend(&trivial_inner, 0.0, &mut ctx, &mut queue);
        assert!(queue.is_empty());
        assert_eq!(ctx.visited, 2);
        Ok(())
    }
}
