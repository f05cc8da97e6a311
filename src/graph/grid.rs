//! Grid loader.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::SpatialGraph;
use crate::error::{PlanError, Result};

/// Parameters of a rectangular grid map.
///
/// Cells are addressed as `(row, column)`. Blocked cells get no location.
///
/// # Examples
///
/// ```
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
///
/// let spec = GridSpec::new(3, 2).with_spacing(2.0).with_obstacles(vec![(0, 1)]);
/// let g = SpatialGraph::from_grid(&spec).unwrap();
/// assert_eq!(g.len(), 5);
/// assert_eq!(g.location("N1_2").unwrap().x(), 4.0);
/// assert!(!g.contains("N0_1"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Distance between adjacent cells.
    pub spacing: f64,
    /// Blocked `(row, column)` cells.
    pub obstacles: Vec<(usize, usize)>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            spacing: 1.0,
            obstacles: Vec::new(),
        }
    }
}

impl GridSpec {
    /// Creates an unobstructed grid with unit spacing.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_obstacles(mut self, obstacles: Vec<(usize, usize)>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Location id of a cell.
    pub fn cell_id(row: usize, col: usize) -> String {
        format!("N{row}_{col}")
    }
}

impl SpatialGraph {
    /// Builds a graph from a grid description.
    pub fn from_grid(spec: &GridSpec) -> Result<Self> {
        let mut graph = Self::new();
        graph.load_grid(spec)?;
        Ok(graph)
    }

    /// Adds one location per unblocked cell at `(col * spacing, row * spacing)`
    /// and connects 4-directionally adjacent unblocked cells with weight
    /// `spacing`.
    pub fn load_grid(&mut self, spec: &GridSpec) -> Result<()> {
        if !spec.spacing.is_finite() || spec.spacing <= 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "grid spacing must be positive, got {}",
                spec.spacing
            )));
        }
        let blocked: HashSet<(usize, usize)> = spec.obstacles.iter().copied().collect();

        for row in 0..spec.height {
            for col in 0..spec.width {
                if !blocked.contains(&(row, col)) {
                    self.add_location(
                        GridSpec::cell_id(row, col),
                        col as f64 * spec.spacing,
                        row as f64 * spec.spacing,
                    )?;
                }
            }
        }

        for row in 0..spec.height {
            for col in 0..spec.width {
                if blocked.contains(&(row, col)) {
                    continue;
                }
                let current = GridSpec::cell_id(row, col);
                // up, down, left, right
                let candidates = [
                    row.checked_sub(1).map(|r| (r, col)),
                    Some((row + 1, col)),
                    col.checked_sub(1).map(|c| (row, c)),
                    Some((row, col + 1)),
                ];
                for (r, c) in candidates.into_iter().flatten() {
                    if r < spec.height && c < spec.width && !blocked.contains(&(r, c)) {
                        self.add_edge(&current, &GridSpec::cell_id(r, c), spec.spacing)?;
                    }
                }
            }
        }

        tracing::debug!(
            locations = self.len(),
            edges = self.num_edges(),
            "grid loaded"
        );
        Ok(())
    }
}
