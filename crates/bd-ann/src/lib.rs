#![deny(clippy::correctness)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::pedantic,
    clippy::nursery,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::cast_lossless
)]
#![doc = include_str!("../README.md")]

pub mod core;
pub mod search;

pub use crate::core::{
    dataset::{MinK, PointSet},
    number::FloatNumber,
    tree::{BdTree, BoundingBox, HalfSpace, Node, ShrinkRule, Side, SplitRule, TreeParams},
};
pub use search::{Hits, KnnLinear, KnnPriority, KnnStandard, ParSearchAlgorithm, QueryContext, RnnFixed, SearchAlgorithm};

/// The current version of the crate.
pub const VERSION: &str = "0.1.0";
