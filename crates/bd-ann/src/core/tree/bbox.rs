//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use crate::{FloatNumber, PointSet};

/// An axis-aligned box given by its low and high corners.
///
/// Both corners are inclusive, so a box may have zero width along any
/// dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox<T> {
    /// The low corner.
    pub(crate) lo: Vec<T>,
    /// The high corner.
    pub(crate) hi: Vec<T>,
}

impl<T: FloatNumber> BoundingBox<T> {
    /// Creates a new box from its corners.
    ///
    /// # Errors
    ///
    /// * If the corners have different dimensions.
    /// * If `lo` exceeds `hi` along any dimension.
    pub fn new(lo: Vec<T>, hi: Vec<T>) -> Result<Self, String> {
        if lo.len() != hi.len() {
            return Err(format!(
                "The corners of a box must have the same dimension: {} vs {}.",
                lo.len(),
                hi.len()
            ));
        }
        if let Some(d) = lo.iter().zip(hi.iter()).position(|(l, h)| l > h) {
            return Err(format!("The low corner exceeds the high corner in dimension {d}."));
        }
        Ok(Self { lo, hi })
    }

    /// Returns the smallest box enclosing the indexed points.
    ///
    /// `indices` must not be empty.
    pub(crate) fn enclosing(data: &PointSet<T>, indices: &[usize]) -> Self {
        let mut lo = data.get(indices[0]).to_vec();
        let mut hi = lo.clone();
        for &i in &indices[1..] {
            for ((l, h), &c) in lo.iter_mut().zip(hi.iter_mut()).zip(data.get(i)) {
                if c < *l {
                    *l = c;
                }
                if c > *h {
                    *h = c;
                }
            }
        }
        Self { lo, hi }
    }

    /// Returns the low corner.
    #[must_use]
    pub fn lo(&self) -> &[T] {
        &self.lo
    }

    /// Returns the high corner.
    #[must_use]
    pub fn hi(&self) -> &[T] {
        &self.hi
    }

    /// Returns the dimension of the box.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.lo.len()
    }

    /// Returns the length of the box along dimension `d`.
    #[must_use]
    pub fn length(&self, d: usize) -> T {
        self.hi[d] - self.lo[d]
    }

    /// Returns whether the point lies on or inside the box.
    #[must_use]
    pub fn contains(&self, p: &[T]) -> bool {
        p.iter()
            .zip(self.lo.iter().zip(self.hi.iter()))
            .all(|(&c, (&l, &h))| l <= c && c <= h)
    }

    /// Returns the squared Euclidean distance from `q` to the nearest point on
    /// or inside the box. This is zero if `q` is inside the box.
    #[must_use]
    pub fn distance_sq(&self, q: &[T]) -> T {
        q.iter()
            .zip(self.lo.iter().zip(self.hi.iter()))
            .map(|(&c, (&l, &h))| {
                if c < l {
                    (l - c).sq()
                } else if c > h {
                    (c - h).sq()
                } else {
                    T::zero()
                }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::BoundingBox;
    use crate::PointSet;

    #[test]
    fn distance() -> Result<(), String> {
        let bbox = BoundingBox::new(vec![0.0, 0.0], vec![2.0, 1.0])?;

        assert_eq!(bbox.distance_sq(&[1.0, 0.5]), 0.0);
        assert_eq!(bbox.distance_sq(&[2.0, 1.0]), 0.0);
        assert_eq!(bbox.distance_sq(&[-1.0, 0.5]), 1.0);
        assert_eq!(bbox.distance_sq(&[4.0, 3.0]), 8.0);
        assert!(approx_eq!(f64, bbox.distance_sq(&[1.5, -0.5]), 0.25, ulps = 2));

        Ok(())
    }

    #[test]
    fn zero_width() -> Result<(), String> {
        let bbox = BoundingBox::new(vec![1.0, 1.0], vec![1.0, 3.0])?;
        assert!(bbox.contains(&[1.0, 2.0]));
        assert_eq!(bbox.distance_sq(&[1.0, 2.0]), 0.0);
        assert_eq!(bbox.distance_sq(&[0.0, 0.0]), 2.0);
        Ok(())
    }

    #[test]
    fn enclosing() -> Result<(), String> {
        let data = PointSet::new(vec![vec![0.0, 5.0], vec![3.0, -1.0], vec![1.0, 2.0]])?;
        let bbox = BoundingBox::enclosing(&data, &[0, 1, 2]);
        assert_eq!(bbox.lo(), &[0.0, -1.0]);
        assert_eq!(bbox.hi(), &[3.0, 5.0]);
        assert!((0..3).all(|i| bbox.contains(data.get(i))));

        let bbox = BoundingBox::enclosing(&data, &[2]);
        assert_eq!(bbox.lo(), bbox.hi());

        assert!(BoundingBox::new(vec![1.0], vec![0.0]).is_err());
        assert!(BoundingBox::new(vec![0.0], vec![1.0, 2.0]).is_err());
        Ok(())
    }
}
