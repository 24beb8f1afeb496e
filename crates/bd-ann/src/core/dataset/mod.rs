//! The point set indexed by a tree and the bounded best-k structure used to
//! collect search results.

mod min_k;
mod point_set;

pub use min_k::MinK;
pub use point_set::PointSet;
