//! Orthogonal half-spaces, used by shrink nodes to describe their inner box.

use serde::{Deserialize, Serialize};

use crate::FloatNumber;

/// The side of a cutting plane that a half-space keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Keeps points with `x[cut_dim] <= cut_val`.
    Low,
    /// Keeps points with `x[cut_dim] >= cut_val`.
    High,
}

/// A half-space bounded by a plane orthogonal to one coordinate axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfSpace<T> {
    /// The dimension orthogonal to the cutting plane.
    pub(crate) cut_dim: usize,
    /// The position of the cutting plane.
    pub(crate) cut_val: T,
    /// The side of the plane kept by the half-space.
    pub(crate) side: Side,
}

impl<T: FloatNumber> HalfSpace<T> {
    /// Creates a new half-space.
    #[must_use]
    pub const fn new(cut_dim: usize, cut_val: T, side: Side) -> Self {
        Self { cut_dim, cut_val, side }
    }

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

    /// Returns the side of the plane kept by the half-space.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Returns whether `q` lies outside the half-space. Points on the plane
    /// are inside.
    #[must_use]
    pub fn is_outside(&self, q: &[T]) -> bool {
        let c = q[self.cut_dim];
        match self.side {
            Side::Low => c > self.cut_val,
            Side::High => c < self.cut_val,
        }
    }

    /// Returns the squared distance from `q` to the cutting plane, which is
    /// the contribution of this half-space to the distance from `q` to a box
    /// bounded by it when `q` is outside.
    #[must_use]
    pub fn distance_sq(&self, q: &[T]) -> T {
        (q[self.cut_dim] - self.cut_val).sq()
    }

    /// Returns the squared distance from `q` to the half-space, i.e. zero if
    /// `q` is inside.
    #[must_use]
    pub fn violation_sq(&self, q: &[T]) -> T {
        if self.is_outside(q) {
            self.distance_sq(q)
        } else {
            T::zero()
        }
    }

    /// Returns the bounding sides of `inner` that are strictly inside `outer`,
    /// i.e. the half-spaces whose intersection with `outer` is `inner`.
    pub(crate) fn sides_of(outer: &super::BoundingBox<T>, inner: &super::BoundingBox<T>) -> Vec<Self> {
        let mut bounds = Vec::new();
        for d in 0..inner.dim() {
            if inner.lo[d] > outer.lo[d] {
                bounds.push(Self::new(d, inner.lo[d], Side::High));
            }
            if inner.hi[d] < outer.hi[d] {
                bounds.push(Self::new(d, inner.hi[d], Side::Low));
            }
        }
        bounds
    }
}
