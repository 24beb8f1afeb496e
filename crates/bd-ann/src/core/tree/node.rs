//! The three kinds of tree nodes.

use serde::{Deserialize, Serialize};

use super::HalfSpace;

/// A node in a kd-tree or bd-tree.
///
/// Children are exclusively owned by their parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node<T> {
    /// A bucket of points.
    Leaf(Leaf),
    /// A cell cut in two by a plane orthogonal to one axis.
    Split(Split<T>),
    /// A cell with an inner box and its complement.
    Shrink(Shrink<T>),
}

/// A leaf owns a contiguous range of the tree's index array.
///
/// A leaf with no points is the trivial leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    /// The position of the first index of the bucket in the tree's index array.
    pub(crate) offset: usize,
    /// The number of points in the bucket.
    pub(crate) cardinality: usize,
}

/// A splitting node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Split<T> {
    /// The dimension orthogonal to the cutting plane.
    pub(crate) cut_dim: usize,
    /// The position of the cutting plane.
    pub(crate) cut_val: T,
    /// The low end of this node's cell along `cut_dim`.
    pub(crate) lo_bound: T,
    /// The high end of this node's cell along `cut_dim`.
    pub(crate) hi_bound: T,
    /// The child on the low side of the cut.
    pub(crate) low: Box<Node<T>>,
    /// The child on the high side of the cut.
    pub(crate) high: Box<Node<T>>,
}

/// A shrinking node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shrink<T> {
    /// The half-spaces whose intersection with this node's cell is the inner box.
    pub(crate) bounds: Vec<HalfSpace<T>>,
    /// The child covering the inner box.
    pub(crate) inner: Box<Node<T>>,
    /// The child covering the rest of the cell.
    pub(crate) outer: Box<Node<T>>,
}

impl Leaf {
    /// Returns the range of the tree's index array owned by this leaf.
    #[must_use]
    pub const fn range(&self) -> core::ops::Range<usize> {
        self.offset..(self.offset + self.cardinality)
    }

    /// Returns the number of points in the bucket.
    #[must_use]
    pub const fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Returns whether this is the trivial leaf.
    #[must_use]
    pub const fn is_trivial(&self) -> bool {
        self.cardinality == 0
    }
}

impl<T: Copy> Split<T> {
    /// Returns the dimension orthogonal to the cutting plane.
    #[must_use]
    pub const fn cut_dim(&self) -> usize {
        self.cut_dim
    }

    /// Returns the position of the cutting plane.
    #[must_use]
    pub fn cut_val(&self) -> T {
        self.cut_val
    }

    /// Returns the low and high children.
    #[must_use]
    pub fn children(&self) -> [&Node<T>; 2] {
        [self.low.as_ref(), self.high.as_ref()]
    }
}

impl<T> Shrink<T> {
    /// Returns the half-spaces bounding the inner box.
    #[must_use]
    pub fn bounds(&self) -> &[HalfSpace<T>] {
        &self.bounds
    }

    /// Returns the inner and outer children.
    #[must_use]
    pub fn children(&self) -> [&Node<T>; 2] {
        [self.inner.as_ref(), self.outer.as_ref()]
    }
}

impl<T> Node<T> {
    /// Returns whether the node is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns the children of the node, if any.
    #[must_use]
    pub fn children(&self) -> Option<[&Self; 2]> {
        match self {
            Self::Leaf(_) => None,
            Self::Split(s) => Some([s.low.as_ref(), s.high.as_ref()]),
            Self::Shrink(s) => Some([s.inner.as_ref(), s.outer.as_ref()]),
        }
    }

    /// Returns the number of points in the subtree.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        match self {
            Self::Leaf(l) => l.cardinality,
            _ => self
                .children()
                .map_or(0, |[a, b]| a.cardinality() + b.cardinality()),
        }
    }

    /// Returns the number of edges on the longest path from this node to a leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        self.children()
            .map_or(0, |[a, b]| 1 + a.height().max(b.height()))
    }

    /// Returns the leaves of the subtree in depth-first order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Leaf(l) => leaves.push(l),
                _ => {
                    if let Some([a, b]) = node.children() {
                        stack.push(b);
                        stack.push(a);
                    }
                }
            }
        }
        leaves
    }
}

#[cfg(test)]
mod tests {
    use super::{HalfSpace, Leaf, Node, Shrink, Split};
    use crate::Side;

    fn leaf(offset: usize, cardinality: usize) -> Box<Node<f64>> {
        Box::new(Node::Leaf(Leaf { offset, cardinality }))
    }

    /// A split whose low side holds a shrink with a trivial outer leaf.
    fn hand_built() -> Node<f64> {
        let shrink = Node::Shrink(Shrink {
            bounds: vec![HalfSpace::new(1, 0.5, Side::Low)],
            inner: leaf(0, 2),
            outer: leaf(2, 0),
        });
        Node::Split(Split {
            cut_dim: 0,
            cut_val: 2.0,
            lo_bound: 0.0,
            hi_bound: 4.0,
            low: Box::new(shrink),
            high: leaf(2, 3),
        })
    }

    #[test]
    fn structure() {
        let root = hand_built();
        assert!(!root.is_leaf());
        assert_eq!(root.cardinality(), 5);
        assert_eq!(root.height(), 2);

        let ranges = root.leaves().into_iter().map(Leaf::range).collect::<Vec<_>>();
        assert_eq!(ranges, vec![0..2, 2..2, 2..5]);
        assert_eq!(root.leaves().iter().filter(|l| l.is_trivial()).count(), 1);

        let Some([low, high]) = root.children() else {
            unreachable!("a split has two children")
        };
        assert_eq!(low.cardinality(), 2);
        assert_eq!(low.height(), 1);
        assert!(high.is_leaf());
        assert_eq!(high.height(), 0);
        assert!(high.children().is_none());

        if let Node::Shrink(shrink) = low {
            assert_eq!(shrink.bounds().len(), 1);
            let [inner, outer] = shrink.children();
            assert_eq!(inner.cardinality(), 2);
            assert_eq!(outer.cardinality(), 0);
        } else {
            unreachable!("the low child is a shrink")
        }
    }
}
