//! The core structs and traits: numbers, point sets, the best-k structure and
//! the kd/bd-tree itself.

pub mod dataset;
pub mod number;
pub mod tree;
