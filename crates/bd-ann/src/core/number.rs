//! The floating-point coordinate type used throughout the crate.
//!
//! All distances are squared Euclidean distances and are represented with the
//! same type as the coordinates.

use core::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::{AddAssign, SubAssign},
};

/// Coordinates of points, and distances between them, are `FloatNumber`s.
///
/// We provide implementations for `f32` and `f64`.
pub trait FloatNumber:
    num_traits::Float + AddAssign + SubAssign + Sum + Default + Send + Sync + Debug + Display + 'static
{
    /// Casts an `f64` to `Self`. This may be a lossy conversion.
    fn from_f64(n: f64) -> Self;

    /// Returns the number as an `f64`. This may be a lossy conversion.
    fn as_f64(self) -> f64;

    /// Returns the square of the number.
    #[must_use]
    fn sq(self) -> Self {
        self * self
    }
}

impl FloatNumber for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_f64(n: f64) -> Self {
        n as Self
    }

    fn as_f64(self) -> f64 {
        f64::from(self)
    }
}

impl FloatNumber for f64 {
    fn from_f64(n: f64) -> Self {
        n
    }

    fn as_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::FloatNumber;

    #[test]
    fn casts() {
        assert_eq!(<f32 as FloatNumber>::from_f64(2.5), 2.5_f32);
        assert_eq!(FloatNumber::as_f64(0.5_f32), 0.5);
        assert_eq!(FloatNumber::sq(-3.0_f64), 9.0);
    }
}
