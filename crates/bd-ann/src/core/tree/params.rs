//! Parameters controlling how a tree is built.

use serde::{Deserialize, Serialize};

/// The rule used to cut a cell in two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SplitRule {
    /// Cut the dimension of maximum point spread at the median point.
    Standard,
    /// Cut the longest side of the cell at its midpoint.
    Midpoint,
    /// Cut the longest side of the cell at its midpoint, sliding the cut to
    /// the nearest point if it would leave one side empty.
    #[default]
    SlidingMidpoint,
}

/// The rule used to decide whether a cell is shrunk instead of split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ShrinkRule {
    /// Never shrink. This builds a kd-tree.
    None,
    /// Shrink to the tight box of the points if it is far from at least two
    /// sides of the cell.
    Simple,
    /// Shrink to the box left after repeatedly splitting off the less
    /// populous half, if this took many splits.
    Centroid,
    /// The recommended rule, currently `Simple`.
    #[default]
    Suggest,
}

/// The parameters used to build a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    /// The maximum number of points in a leaf.
    pub(crate) bucket_size: usize,
    /// The rule for splitting cells.
    pub(crate) split_rule: SplitRule,
    /// The rule for shrinking cells.
    pub(crate) shrink_rule: ShrinkRule,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            bucket_size: 1,
            split_rule: SplitRule::default(),
            shrink_rule: ShrinkRule::default(),
        }
    }
}

impl TreeParams {
    /// Parameters for a kd-tree, i.e. a tree without shrinking nodes.
    #[must_use]
    pub fn kd() -> Self {
        Self::default().with_shrink_rule(ShrinkRule::None)
    }

    /// Parameters for a bd-tree with the recommended rules.
    #[must_use]
    pub fn bd() -> Self {
        Self::default()
    }

    /// Sets the maximum number of points in a leaf.
    #[must_use]
    pub const fn with_bucket_size(mut self, bucket_size: usize) -> Self {
        self.bucket_size = bucket_size;
        self
    }

    /// Sets the rule for splitting cells.
    #[must_use]
    pub const fn with_split_rule(mut self, split_rule: SplitRule) -> Self {
        self.split_rule = split_rule;
        self
    }

    /// Sets the rule for shrinking cells.
    #[must_use]
    pub const fn with_shrink_rule(mut self, shrink_rule: ShrinkRule) -> Self {
        self.shrink_rule = shrink_rule;
        self
    }

    /// Returns the maximum number of points in a leaf.
    #[must_use]
    pub const fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Returns the rule for splitting cells.
    #[must_use]
    pub const fn split_rule(&self) -> SplitRule {
        self.split_rule
    }

    /// Returns the rule for shrinking cells.
    #[must_use]
    pub const fn shrink_rule(&self) -> ShrinkRule {
        self.shrink_rule
    }
}
