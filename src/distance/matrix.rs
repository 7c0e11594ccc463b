//! Dense integer distance matrix.

use crate::models::Node;

/// A dense n×n travel-time matrix stored in row-major order.
///
/// Entries are non-negative integers indexed by node id. Built either
/// from node coordinates (Euclidean distance truncated toward zero) or
/// from explicit data.
///
/// # Examples
///
/// ```
/// use u_tsptw::models::{Node, TimeWindow};
/// use u_tsptw::distance::DistanceMatrix;
///
/// let tw = TimeWindow::new(0, 100).unwrap();
/// let nodes = vec![
///     Node::new(0, 0.0, 0.0, tw),
///     Node::new(1, 3.0, 4.0, tw),
///     Node::new(2, 1.0, 1.0, tw),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// assert_eq!(dm.get(0, 1), 5);
/// assert_eq!(dm.get(0, 2), 1); // sqrt(2) truncated
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    data: Vec<i64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Computes a truncated Euclidean distance matrix from node coordinates.
    ///
    /// Rows and columns are indexed by node id, so the matrix has
    /// `max id + 1` rows.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let size = nodes.iter().map(|n| n.id() + 1).max().unwrap_or(0);
        let mut dm = Self::new(size);
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                let d = a.distance_to(b) as i64;
                dm.set(a.id(), b.id(), d);
                dm.set(b.id(), a.id(), d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size` or
    /// any entry is negative.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size || data.iter().any(|&d| d < 0) {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the travel time from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the travel time from node `from` to node `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: i64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix has a row and column for `id`.
    pub fn covers(&self, id: usize) -> bool {
        id < self.size
    }

    /// Returns `true` if `get(i, j) == get(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        self.asymmetric_pair().is_none()
    }

    /// First pair `(i, j)` with `i < j` and `get(i, j) != get(j, i)`.
    pub fn asymmetric_pair(&self) -> Option<(usize, usize)> {
        (0..self.size)
            .flat_map(|i| ((i + 1)..self.size).map(move |j| (i, j)))
            .find(|&(i, j)| self.get(i, j) != self.get(j, i))
    }
}
