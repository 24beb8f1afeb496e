//! Recursive construction of kd-trees and bd-trees.

use core::cmp::Ordering;

use crate::{FloatNumber, PointSet};

use super::{BoundingBox, HalfSpace, Leaf, Node, Shrink, ShrinkRule, Split, SplitRule, TreeParams};

/// Sides whose length is within this fraction of the longest side count as
/// the longest side.
const LENGTH_TOLERANCE: f64 = 0.001;

/// A side of the tight box is shrunk if its gap to the cell is at least this
/// fraction of the longest side of the cell.
const GAP_THRESHOLD: f64 = 0.5;

/// The minimum number of shrunk sides for a simple shrink.
const MIN_SHRUNK_SIDES: usize = 2;

/// How a cell is decomposed.
enum Decomposition<T> {
    /// Cut the cell with the split rule.
    Split,
    /// Shrink the cell to the given inner box.
    Shrink(BoundingBox<T>),
}

/// Counts of the nodes created while building a tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct BuildStats {
    /// Leaves with at least one point.
    pub(crate) leaves: usize,
    /// Leaves with no points.
    pub(crate) trivial_leaves: usize,
    /// Splitting nodes.
    pub(crate) splits: usize,
    /// Shrinking nodes.
    pub(crate) shrinks: usize,
    /// The depth of the deepest node.
    pub(crate) depth: usize,
}

/// Builds the nodes of a tree over a `PointSet`.
pub(crate) struct Builder<'a, T> {
    /// The points being indexed.
    data: &'a PointSet<T>,
    /// The build parameters.
    params: TreeParams,
    /// Counts of the nodes created so far.
    pub(crate) stats: BuildStats,
}

impl<'a, T: FloatNumber> Builder<'a, T> {
    /// Creates a new `Builder`.
    pub(crate) fn new(data: &'a PointSet<T>, params: TreeParams) -> Self {
        Self {
            data,
            params,
            stats: BuildStats::default(),
        }
    }

    /// Recursively builds the subtree for the points in `indices`, which lie in
    /// the cell `bbox` and start at position `offset` in the tree's index array.
    ///
    /// The points in `indices` are permuted so that every leaf owns a
    /// contiguous range.
    pub(crate) fn build(&mut self, indices: &mut [usize], offset: usize, bbox: &BoundingBox<T>, depth: usize) -> Node<T> {
        self.stats.depth = self.stats.depth.max(depth);

        let n = indices.len();
        if n <= self.params.bucket_size || max_spread(self.data, indices).1 <= T::zero() {
            return self.leaf(offset, n);
        }

        if let Decomposition::Shrink(inner) = self.decompose(indices, bbox) {
            let bounds = HalfSpace::sides_of(bbox, &inner);
            let n_in = box_split(self.data, indices, &inner);
            if n_in > 0 && !bounds.is_empty() {
                self.stats.shrinks += 1;
                let (ins, outs) = indices.split_at_mut(n_in);
                let inner_node = self.build(ins, offset, &inner, depth + 1);
                let outer_node = self.build(outs, offset + n_in, bbox, depth + 1);
                return Node::Shrink(Shrink {
                    bounds,
                    inner: Box::new(inner_node),
                    outer: Box::new(outer_node),
                });
            }
        }

        self.split(indices, offset, bbox, depth)
    }

    /// Creates a leaf over `cardinality` indices starting at `offset`.
    fn leaf(&mut self, offset: usize, cardinality: usize) -> Node<T> {
        if cardinality == 0 {
            self.stats.trivial_leaves += 1;
        } else {
            self.stats.leaves += 1;
        }
        Node::Leaf(Leaf { offset, cardinality })
    }

    /// Cuts the cell with the split rule and builds both children.
    fn split(&mut self, indices: &mut [usize], offset: usize, bbox: &BoundingBox<T>, depth: usize) -> Node<T> {
        let n = indices.len();
        let (cd, cv, n_lo) = self.cut(indices, bbox);
        let (lv, hv) = (bbox.lo[cd], bbox.hi[cd]);

        // A cut that leaves every point on one side without shrinking the cell
        // would recurse forever.
        if (n_lo == 0 && cv <= lv) || (n_lo == n && cv >= hv) {
            return self.leaf(offset, n);
        }

        self.stats.splits += 1;
        let mut lo_box = bbox.clone();
        lo_box.hi[cd] = cv;
        let mut hi_box = bbox.clone();
        hi_box.lo[cd] = cv;

        let (lows, highs) = indices.split_at_mut(n_lo);
        let low = self.build(lows, offset, &lo_box, depth + 1);
        let high = self.build(highs, offset + n_lo, &hi_box, depth + 1);

        Node::Split(Split {
            cut_dim: cd,
            cut_val: cv,
            lo_bound: lv,
            hi_bound: hv,
            low: Box::new(low),
            high: Box::new(high),
        })
    }

    /// Applies the split rule to the points in the cell.
    ///
    /// Returns the cutting dimension, the cutting value and the number of
    /// points on the low side. The points are permuted so that those on the
    /// low side come first.
    fn cut(&self, indices: &mut [usize], bbox: &BoundingBox<T>) -> (usize, T, usize) {
        let n = indices.len();
        let half = T::from_f64(0.5);

        match self.params.split_rule {
            SplitRule::Standard => {
                let (cd, _) = max_spread(self.data, indices);
                let n_lo = n / 2;
                let cv = median_split(self.data, indices, cd, n_lo);
                (cd, cv, n_lo)
            }
            SplitRule::Midpoint | SplitRule::SlidingMidpoint => {
                let sliding = matches!(self.params.split_rule, SplitRule::SlidingMidpoint);
                let cd = longest_side(self.data, indices, bbox);
                let ideal = (bbox.lo[cd] + bbox.hi[cd]) * half;
                let (min, max) = min_max(self.data, indices, cd);

                let cv = if sliding && ideal < min {
                    min
                } else if sliding && ideal > max {
                    max
                } else {
                    ideal
                };
                let (br1, br2) = plane_split(self.data, indices, cd, cv);

                let n_lo = if sliding && ideal < min {
                    1
                } else if sliding && ideal > max {
                    n - 1
                } else if br1 > n / 2 {
                    br1
                } else if br2 < n / 2 {
                    br2
                } else {
                    n / 2
                };
                (cd, cv, n_lo)
            }
        }
    }

    /// Applies the shrink rule to decide how to decompose the cell.
    fn decompose(&self, indices: &mut [usize], bbox: &BoundingBox<T>) -> Decomposition<T> {
        match self.params.shrink_rule {
            ShrinkRule::None => Decomposition::Split,
            ShrinkRule::Simple | ShrinkRule::Suggest => self.simple_shrink(indices, bbox),
            ShrinkRule::Centroid => self.centroid_shrink(indices, bbox),
        }
    }

    /// Shrinks to the tight box of the points if enough of its sides are far
    /// from the cell. Sides that are close to the cell are left at the cell.
    fn simple_shrink(&self, indices: &[usize], bbox: &BoundingBox<T>) -> Decomposition<T> {
        let mut inner = BoundingBox::enclosing(self.data, indices);
        let threshold = max_length(bbox) * T::from_f64(GAP_THRESHOLD);

        let mut shrunk = 0;
        for d in 0..bbox.dim() {
            let gap = bbox.hi[d] - inner.hi[d];
            if gap > T::zero() && gap >= threshold {
                shrunk += 1;
            } else {
                inner.hi[d] = bbox.hi[d];
            }

            let gap = inner.lo[d] - bbox.lo[d];
            if gap > T::zero() && gap >= threshold {
                shrunk += 1;
            } else {
                inner.lo[d] = bbox.lo[d];
            }
        }

        if shrunk >= MIN_SHRUNK_SIDES {
            Decomposition::Shrink(inner)
        } else {
            Decomposition::Split
        }
    }

    /// Repeatedly cuts the cell with the split rule, keeping the side with
    /// more points, until at most half of the points remain. Shrinks to the
    /// remaining box if this took more than `dim / 2` cuts.
    fn centroid_shrink(&self, indices: &mut [usize], bbox: &BoundingBox<T>) -> Decomposition<T> {
        let goal = indices.len() / 2;
        let mut inner = bbox.clone();
        let (mut start, mut end) = (0, indices.len());
        let mut n_cuts = 0;

        while end - start > goal {
            let n_sub = end - start;
            let (cd, cv, n_lo) = self.cut(&mut indices[start..end], &inner);
            if n_lo == 0 || n_lo == n_sub {
                break;
            }
            n_cuts += 1;
            if n_lo >= n_sub / 2 {
                inner.hi[cd] = cv;
                end = start + n_lo;
            } else {
                inner.lo[cd] = cv;
                start += n_lo;
            }
        }

        if 2 * n_cuts > bbox.dim() {
            Decomposition::Shrink(inner)
        } else {
            Decomposition::Split
        }
    }
}

/// Returns the length of the longest side of the box.
fn max_length<T: FloatNumber>(bbox: &BoundingBox<T>) -> T {
    (0..bbox.dim()).map(|d| bbox.length(d)).fold(T::zero(), T::max)
}

/// Returns the minimum and maximum coordinate of the points along `d`.
fn min_max<T: FloatNumber>(data: &PointSet<T>, indices: &[usize], d: usize) -> (T, T) {
    indices.iter().map(|&i| data.get(i)[d]).fold(
        (T::infinity(), T::neg_infinity()),
        |(min, max), c| (min.min(c), max.max(c)),
    )
}

/// Returns the dimension along which the points are most spread out, and
/// that spread.
fn max_spread<T: FloatNumber>(data: &PointSet<T>, indices: &[usize]) -> (usize, T) {
    (0..data.dim())
        .map(|d| {
            let (min, max) = min_max(data, indices, d);
            (d, max - min)
        })
        .fold((0, T::neg_infinity()), |best, (d, s)| if s > best.1 { (d, s) } else { best })
}

/// Returns the dimension to cut with the midpoint rules: among the (nearly)
/// longest sides of the cell, the one along which the points are most spread
/// out.
fn longest_side<T: FloatNumber>(data: &PointSet<T>, indices: &[usize], bbox: &BoundingBox<T>) -> usize {
    let min_length = max_length(bbox) * T::from_f64(1.0 - LENGTH_TOLERANCE);
    (0..bbox.dim())
        .filter(|&d| bbox.length(d) >= min_length)
        .map(|d| {
            let (min, max) = min_max(data, indices, d);
            (d, max - min)
        })
        .fold((0, T::neg_infinity()), |best, (d, s)| if s > best.1 { (d, s) } else { best })
        .0
}

/// Permutes the points so that the first `n_lo` are at most the returned
/// cutting value along `d`, and the rest at least that value.
fn median_split<T: FloatNumber>(data: &PointSet<T>, indices: &mut [usize], d: usize, n_lo: usize) -> T {
    let coord = |i: usize| data.get(i)[d];
    indices.select_nth_unstable_by(n_lo, |&a, &b| coord(a).partial_cmp(&coord(b)).unwrap_or(Ordering::Equal));
    let max_lo = indices[..n_lo]
        .iter()
        .map(|&i| coord(i))
        .fold(T::neg_infinity(), T::max);
    (max_lo + coord(indices[n_lo])) * T::from_f64(0.5)
}

/// Permutes the points into those below `cv` along `d`, those on `cv`, and
/// those above `cv`. Returns the number of points below and the number of
/// points at or below `cv`.
fn plane_split<T: FloatNumber>(data: &PointSet<T>, indices: &mut [usize], d: usize, cv: T) -> (usize, usize) {
    let br1 = partition(indices, |i| data.get(i)[d] < cv);
    let br2 = br1 + partition(&mut indices[br1..], |i| data.get(i)[d] <= cv);
    (br1, br2)
}

/// Permutes the points so that those inside `inner` come first, and returns
/// how many there are.
fn box_split<T: FloatNumber>(data: &PointSet<T>, indices: &mut [usize], inner: &BoundingBox<T>) -> usize {
    partition(indices, |i| inner.contains(data.get(i)))
}

/// Moves the indices satisfying `pred` to the front and returns their count.
fn partition<P: Fn(usize) -> bool>(indices: &mut [usize], pred: P) -> usize {
    let mut n = 0;
    for j in 0..indices.len() {
        if pred(indices[j]) {
            indices.swap(j, n);
            n += 1;
        }
    }
    n
}
