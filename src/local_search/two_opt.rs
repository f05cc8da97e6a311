//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For a depot-framed route `r`, scan position pairs `1 <= i < j <= len-2`
//! (`i` ascending, then `j` ascending) and compute the gain of reversing the
//! segment `r[i..=j]`:
//!
//! ```text
//! gain = d(r[i-1], r[i]) + d(r[j], r[j+1]) - d(r[i-1], r[j]) - d(r[i], r[j+1])
//! ```
//!
//! The first pair whose gain exceeds the threshold is reversed and the scan
//! restarts from the beginning (first-improvement strategy). The search
//! stops after a full scan without a move or after `max_iterations` scans.
//! The depot endpoints never move and stops never change vehicles.
//!
//! # Complexity
//!
//! O(n²) per scan.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{PlanError, Result};
use crate::graph::SpatialGraph;
use crate::models::{RouteForm, Solution};
use crate::pathfinding::path_distance;

/// Parameters of the 2-opt refiner.
///
/// # Examples
///
/// ```
/// use u_routeplan::local_search::TwoOptConfig;
///
/// let config = TwoOptConfig::default()
///     .with_improvement_threshold(1e-6)
///     .with_max_iterations(50);
/// assert_eq!(config.max_iterations, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoOptConfig {
    /// Minimum distance reduction for a reversal to count as improving.
    pub improvement_threshold: f64,
    /// Maximum number of full scans.
    pub max_iterations: usize,
}

impl Default for TwoOptConfig {
    fn default() -> Self {
        Self {
            improvement_threshold: 0.001,
            max_iterations: 1000,
        }
    }
}

impl TwoOptConfig {
    pub fn with_improvement_threshold(mut self, threshold: f64) -> Self {
        self.improvement_threshold = threshold;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.improvement_threshold >= 0.0) {
            return Err(PlanError::InvalidConfig(format!(
                "improvement_threshold must be non-negative, got {}",
                self.improvement_threshold
            )));
        }
        Ok(())
    }
}

/// Applies 2-opt to one depot-framed route and returns the improved route.
///
/// The input is left untouched. Routes with fewer than four entries have no
/// movable pair and come back unchanged.
///
/// # Errors
///
/// [`PlanError::UnknownLocation`] if the route names a location the graph
/// does not contain.
///
/// # Examples
///
/// ```
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::local_search::two_opt;
/// use u_routeplan::pathfinding::path_distance;
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(4, 1)).unwrap();
/// let route: Vec<String> = ["N0_0", "N0_1", "N0_3", "N0_2", "N0_0"]
///     .iter().map(|s| s.to_string()).collect();
///
/// let improved = two_opt(&g, &route, 0.001, 1000).unwrap();
/// assert!(path_distance(&g, &improved) <= path_distance(&g, &route));
/// assert_eq!(improved.first(), route.first());
/// assert_eq!(improved.last(), route.last());
/// ```
pub fn two_opt(
    graph: &SpatialGraph,
    route: &[String],
    improvement_threshold: f64,
    max_iterations: usize,
) -> Result<Vec<String>> {
    let indices = graph.resolve(route)?;
    let improved = two_opt_indices(
        &indices,
        |a, b| graph.distance_between(a, b),
        improvement_threshold,
        max_iterations,
    );
    Ok(improved
        .into_iter()
        .map(|i| graph.id_at(i).to_string())
        .collect())
}

fn two_opt_indices(
    route: &[usize],
    dist: impl Fn(usize, usize) -> f64,
    improvement_threshold: f64,
    max_iterations: usize,
) -> Vec<usize> {
    let mut best = route.to_vec();
    let n = best.len();
    let mut scans = 0;
    let mut improved = true;

    while improved && scans < max_iterations {
        improved = false;
        scans += 1;

        'scan: for i in 1..n.saturating_sub(2) {
            for j in i + 1..n - 1 {
                let current = dist(best[i - 1], best[i]) + dist(best[j], best[j + 1]);
                let reversed = dist(best[i - 1], best[j]) + dist(best[i], best[j + 1]);
                if current - reversed > improvement_threshold {
                    best[i..=j].reverse();
                    improved = true;
                    break 'scan;
                }
            }
        }
    }

    trace!(scans, converged = !improved, "2-opt finished");
    best
}

/// Applies [`two_opt`] independently to every route of a solution.
///
/// The result is depot-framed whatever the input form.
pub fn two_opt_solution(
    graph: &SpatialGraph,
    solution: &Solution,
    config: &TwoOptConfig,
) -> Result<Solution> {
    config.validate()?;
    let framed = solution.depot_framed();

    let mut routes = BTreeMap::new();
    let mut before = 0.0;
    let mut after = 0.0;
    for (vehicle_id, route) in framed.routes() {
        let improved = two_opt(
            graph,
            route,
            config.improvement_threshold,
            config.max_iterations,
        )?;
        before += path_distance(graph, route);
        after += path_distance(graph, &improved);
        routes.insert(vehicle_id.clone(), improved);
    }

    debug!(before, after, routes = routes.len(), "2-opt refinement done");
    Ok(framed.with_routes(RouteForm::DepotFramed, routes))
}
