//! Kd-trees and box-decomposition (bd) trees over a `PointSet`.
//!
//! A kd-tree recursively cuts the bounding box of the points with planes
//! orthogonal to the coordinate axes. A bd-tree may also "shrink" a cell to an
//! inner box, which keeps cells fat even when the points are clustered.

mod bbox;
mod build;
mod half_space;
mod node;
mod params;

use serde::{Deserialize, Serialize};

pub use bbox::BoundingBox;
pub use half_space::{HalfSpace, Side};
pub use node::{Leaf, Node, Shrink, Split};
pub use params::{ShrinkRule, SplitRule, TreeParams};

use crate::{FloatNumber, PointSet};

/// A kd-tree or bd-tree built over a `PointSet`.
///
/// The tree owns its points and is immutable once built, so it may be shared
/// between threads that search it concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BdTree<T> {
    /// The indexed points.
    data: PointSet<T>,
    /// A permutation of the point indices; every leaf owns a contiguous range.
    indices: Vec<usize>,
    /// The root of the tree.
    root: Node<T>,
    /// The smallest box enclosing all points.
    bbox: BoundingBox<T>,
    /// The parameters used to build the tree.
    params: TreeParams,
}

impl<T: FloatNumber> BdTree<T> {
    /// Builds a tree over the given points.
    ///
    /// # Errors
    ///
    /// * See [`PointSet::new`].
    /// * See [`BdTree::from_point_set`].
    pub fn new(points: Vec<Vec<T>>, params: TreeParams) -> Result<Self, String> {
        Self::from_point_set(PointSet::new(points)?, params)
    }

    /// Builds a tree over the given `PointSet`.
    ///
    /// # Errors
    ///
    /// * If the bucket size is zero.
    pub fn from_point_set(data: PointSet<T>, params: TreeParams) -> Result<Self, String> {
        if params.bucket_size == 0 {
            return Err("The bucket size must be at least 1.".to_string());
        }

        let mut indices = (0..data.cardinality()).collect::<Vec<_>>();
        let bbox = BoundingBox::enclosing(&data, &indices);

        let mut builder = build::Builder::new(&data, params);
        let root = builder.build(&mut indices, 0, &bbox, 0);
        let stats = builder.stats;

        ftlog::debug!(
            "Built a tree over {} points in {} dimensions: {} leaves ({} trivial), {} splits, {} shrinks, depth {}.",
            data.cardinality(),
            data.dim(),
            stats.leaves,
            stats.trivial_leaves,
            stats.splits,
            stats.shrinks,
            stats.depth
        );

        Ok(Self {
            data,
            indices,
            root,
            bbox,
            params,
        })
    }
}

impl<T> BdTree<T> {
    /// Returns the indexed points.
    #[must_use]
    pub const fn data(&self) -> &PointSet<T> {
        &self.data
    }

    /// Returns the number of indexed points.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.data.cardinality()
    }

    /// Returns the dimension of the indexed points.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.data.dim()
    }

    /// Returns the root of the tree.
    #[must_use]
    pub const fn root(&self) -> &Node<T> {
        &self.root
    }

    /// Returns the smallest box enclosing all points.
    #[must_use]
    pub const fn bbox(&self) -> &BoundingBox<T> {
        &self.bbox
    }

    /// Returns the permutation of point indices whose contiguous ranges are
    /// owned by the leaves.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the indices of the points in a leaf.
    #[must_use]
    pub fn bucket(&self, leaf: &Leaf) -> &[usize] {
        &self.indices[leaf.range()]
    }

    /// Returns the parameters used to build the tree.
    #[must_use]
    pub const fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Consumes the tree and returns the indexed points.
    #[must_use]
    pub fn into_point_set(self) -> PointSet<T> {
        self.data
    }
}
