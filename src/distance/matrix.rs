//! Dense distance matrix over a subset of graph locations.

use crate::graph::SpatialGraph;

/// A dense n×n straight-line distance matrix stored in row-major order.
///
/// Rows and columns are local indices `0..n` into the list of graph
/// locations the matrix was built from. Optimization loops evaluate the same
/// few locations many times, so distances are computed once up front.
///
/// # Examples
///
/// ```
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::distance::DistanceMatrix;
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(4, 4)).unwrap();
/// let dm = DistanceMatrix::from_ids(&g, &["N0_0", "N0_3", "N3_3"]).unwrap();
/// assert_eq!(dm.size(), 3);
/// assert!((dm.get(0, 1) - 3.0).abs() < 1e-10);
/// assert!((dm.get(0, 2) - 18f64.sqrt()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes the matrix for the given graph arena indices.
    pub(crate) fn from_indices(graph: &SpatialGraph, indices: &[usize]) -> Self {
        let n = indices.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = graph.distance_between(indices[i], indices[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Computes the matrix for the given location ids.
    ///
    /// Returns `None` if an id is not in the graph.
    pub fn from_ids(graph: &SpatialGraph, ids: &[&str]) -> Option<Self> {
        let indices = ids
            .iter()
            .map(|id| graph.index_of(id))
            .collect::<Option<Vec<usize>>>()?;
        Some(Self::from_indices(graph, &indices))
    }

    /// Returns the distance between local indices `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}
