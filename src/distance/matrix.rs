//! Dense distance matrix.

use crate::error::{DispatchError, Result};

/// A dense n×n distance matrix stored in row-major order.
///
/// Location 0 is conventionally the depot. Distances are non-negative and
/// symmetric, with zero on the diagonal.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_lower_triangle(&[
///     vec![0.0],
///     vec![7.2, 0.0],
///     vec![3.8, 7.1, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(dm.get(2, 1), 7.1);
/// assert_eq!(dm.get(1, 2), 7.1);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from the lower triangle of a distance table.
    ///
    /// Row `i` holds the distances from location `i` to locations `0..=i`,
    /// the layout distance tables are usually published in. The upper
    /// triangle is mirrored from it.
    pub fn from_lower_triangle(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        let mut dm = Self::new(size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != i + 1 {
                return Err(DispatchError::InvalidMatrix {
                    reason: format!("row {i} has {} entries, expected {}", row.len(), i + 1),
                });
            }
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(DispatchError::InvalidMatrix {
                        reason: format!("distance {i}->{j} is {d}"),
                    });
                }
                if i == j && d != 0.0 {
                    return Err(DispatchError::InvalidMatrix {
                        reason: format!("diagonal entry {i} is {d}"),
                    });
                }
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        Ok(dm)
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        assert!(
            from < self.size && to < self.size,
            "location out of range: {from}->{to} in matrix of size {}",
            self.size
        );
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `Ok` if `location` is a valid index into this matrix.
    pub fn check(&self, location: usize) -> Result<()> {
        if location < self.size {
            Ok(())
        } else {
            Err(DispatchError::DestinationOutOfRange {
                destination: location,
                size: self.size,
            })
        }
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the candidates paired with their distance from `origin`,
    /// ascending by distance with ties broken by ascending id.
    ///
    /// `origin` itself is kept if it appears among the candidates.
    pub fn nearest_neighbors(&self, origin: usize, candidates: &[usize]) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = candidates
            .iter()
            .map(|&c| (c, self.get(origin, c)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked
    }

    /// Returns the nearest neighbor of `from` among the given candidates.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        self.nearest_neighbors(from, candidates)
            .first()
            .map(|&(id, _)| id)
    }
}
