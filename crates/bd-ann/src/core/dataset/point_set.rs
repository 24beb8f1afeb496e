//! A `PointSet` is the array of points indexed by a tree.

use serde::{Deserialize, Serialize};

use crate::FloatNumber;

/// A `PointSet` is a non-empty collection of points of the same dimension.
///
/// Points are addressed by their index in the collection, and search results
/// refer to points by these indices. The points are never modified once the
/// set is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSet<T> {
    /// The points in the set.
    points: Vec<Vec<T>>,
    /// The dimension of every point.
    dim: usize,
}

impl<T: FloatNumber> PointSet<T> {
    /// Creates a new `PointSet`.
    ///
    /// # Errors
    ///
    /// * If `points` is empty.
    /// * If the first point has no coordinates.
    /// * If the points do not all have the same dimension.
    /// * If any coordinate is not finite.
    pub fn new(points: Vec<Vec<T>>) -> Result<Self, String> {
        let dim = points.first().map_or(0, Vec::len);
        if points.is_empty() {
            return Err("The points are empty.".to_string());
        }
        if dim == 0 {
            return Err("The points must have at least one dimension.".to_string());
        }

        for (i, p) in points.iter().enumerate() {
            if p.len() != dim {
                return Err(format!(
                    "Point {i} has dimension {} but the first point has dimension {dim}.",
                    p.len()
                ));
            }
            if let Some(c) = p.iter().find(|c| !c.is_finite()) {
                return Err(format!("Point {i} has a non-finite coordinate {c}."));
            }
        }

        Ok(Self { points, dim })
    }

    /// Creates a new `PointSet` from a row-major flat array of coordinates.
    ///
    /// # Errors
    ///
    /// * If `dim` is zero or does not divide the length of `coordinates`.
    /// * See [`PointSet::new`].
    pub fn from_flat(coordinates: &[T], dim: usize) -> Result<Self, String> {
        if dim == 0 || coordinates.len() % dim != 0 {
            return Err(format!(
                "Cannot split {} coordinates into points of dimension {dim}.",
                coordinates.len()
            ));
        }
        Self::new(coordinates.chunks_exact(dim).map(<[T]>::to_vec).collect())
    }
}

impl<T> PointSet<T> {
    /// Returns the point at the given index.
    ///
    /// # Panics
    ///
    /// * If `index` is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> &[T] {
        &self.points[index]
    }

    /// Returns the number of points.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.points.len()
    }

    /// Returns the dimension of the points.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the points as a slice.
    #[must_use]
    pub fn points(&self) -> &[Vec<T>] {
        &self.points
    }

    /// Consumes the `PointSet` and returns the points.
    #[must_use]
    pub fn into_points(self) -> Vec<Vec<T>> {
        self.points
    }
}

impl<T: FloatNumber> PointSet<T> {
    /// Returns the squared Euclidean distance from a query to an indexed point.
    #[must_use]
    pub fn distance_sq(&self, query: &[T], index: usize) -> T {
        query
            .iter()
            .zip(self.get(index))
            .map(|(&q, &p)| (q - p).sq())
            .sum()
    }

    /// Returns the squared distance from a query to an indexed point, or `None`
    /// as soon as the partial sum exceeds `threshold`.
    #[must_use]
    pub fn distance_sq_within(&self, query: &[T], index: usize, threshold: T) -> Option<T> {
        let mut dist = T::zero();
        for (&q, &p) in query.iter().zip(self.get(index)) {
            dist += (q - p).sq();
            if dist > threshold {
                return None;
            }
        }
        Some(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::PointSet;

    #[test]
    fn new() -> Result<(), String> {
        let data = PointSet::new(vec![vec![0.0, 0.0], vec![3.0, 4.0]])?;
        assert_eq!(data.cardinality(), 2);
        assert_eq!(data.dim(), 2);
        assert_eq!(data.get(1), &[3.0, 4.0]);
        assert_eq!(data.distance_sq(&[0.0, 0.0], 1), 25.0);

        let flat = PointSet::from_flat(&[0.0_f32, 0.0, 3.0, 4.0], 2)?;
        assert_eq!(flat.get(1), &[3.0, 4.0]);

        Ok(())
    }

    #[test]
    fn invalid() {
        assert!(PointSet::<f64>::new(vec![]).is_err());
        assert!(PointSet::<f64>::new(vec![vec![]]).is_err());
        assert!(PointSet::new(vec![vec![0.0, 0.0], vec![1.0]]).is_err());
        assert!(PointSet::new(vec![vec![0.0, f64::NAN]]).is_err());
        assert!(PointSet::from_flat(&[0.0, 1.0, 2.0], 2).is_err());
        assert!(PointSet::from_flat(&[0.0, 1.0], 0).is_err());
    }

    #[test]
    fn early_exit() -> Result<(), String> {
        let data = PointSet::new(vec![vec![1.0, 1.0, 1.0]])?;
        let query = [0.0, 0.0, 0.0];
        assert_eq!(data.distance_sq_within(&query, 0, 3.0), Some(3.0));
        assert_eq!(data.distance_sq_within(&query, 0, 1.5), None);
        Ok(())
    }
}
