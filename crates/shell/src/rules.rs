//! Command-line names for tree construction rules and search algorithms.

use bd_ann::{KnnLinear, KnnPriority, KnnStandard, ParSearchAlgorithm, RnnFixed, ShrinkRule, SplitRule};

/// The rules for choosing cutting planes.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Split {
    /// Cut at the median of the points along the widest dimension.
    #[clap(name = "standard")]
    Standard,
    /// Cut the cell in half along its longest side.
    #[clap(name = "midpoint")]
    Midpoint,
    /// Cut in half, sliding the cut to the nearest point if one side would be empty.
    #[clap(name = "sliding-midpoint")]
    SlidingMidpoint,
}

impl From<Split> for SplitRule {
    fn from(split: Split) -> Self {
        match split {
            Split::Standard => Self::Standard,
            Split::Midpoint => Self::Midpoint,
            Split::SlidingMidpoint => Self::SlidingMidpoint,
        }
    }
}

/// The rules for shrinking cells.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Shrink {
    /// Never shrink, building a kd-tree.
    #[clap(name = "none")]
    None,
    /// Shrink to the tight box of the points when it leaves wide gaps.
    #[clap(name = "simple")]
    Simple,
    /// Shrink by repeated splitting around the centroid of the points.
    #[clap(name = "centroid")]
    Centroid,
    /// The recommended rule.
    #[clap(name = "suggest")]
    Suggest,
}

impl From<Shrink> for ShrinkRule {
    fn from(shrink: Shrink) -> Self {
        match shrink {
            Shrink::None => Self::None,
            Shrink::Simple => Self::Simple,
            Shrink::Centroid => Self::Centroid,
            Shrink::Suggest => Self::Suggest,
        }
    }
}

/// The k-NN search algorithms.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Algorithm {
    /// Depth-first search.
    #[clap(name = "standard")]
    Standard,
    /// Best-first search.
    #[clap(name = "priority")]
    Priority,
    /// Exact search by a linear scan.
    #[clap(name = "linear")]
    Linear,
}

impl Algorithm {
    /// Builds the search to run for each query. A `radius` switches to
    /// fixed-radius search.
    pub fn build(
        self,
        k: usize,
        epsilon: f64,
        max_visited: usize,
        radius: Option<f64>,
    ) -> Box<dyn ParSearchAlgorithm<f64>> {
        match (radius, self) {
            (Some(r), _) => Box::new(
                RnnFixed::new(r * r, k)
                    .with_epsilon(epsilon)
                    .with_max_visited(max_visited),
            ),
            (None, Self::Standard) => Box::new(KnnStandard::new(k, epsilon).with_max_visited(max_visited)),
            (None, Self::Priority) => Box::new(KnnPriority::new(k, epsilon).with_max_visited(max_visited)),
            (None, Self::Linear) => Box::new(KnnLinear(k)),
        }
    }
}
