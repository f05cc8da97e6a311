//! Distance metrics for solutions and full paths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::SpatialGraph;
use crate::models::Solution;
use crate::pathfinding::path_distance;

/// Aggregate distance figures of a set of routes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Sum of all vehicle distances.
    pub total_distance: f64,
    /// Number of vehicles with a route entry.
    pub num_vehicles: usize,
    /// Number of stops over all vehicles.
    pub num_stops: usize,
    /// Distance driven by each vehicle.
    pub distance_per_vehicle: BTreeMap<String, f64>,
}

impl RouteMetrics {
    /// Mean distance per vehicle, `0.0` without vehicles.
    pub fn mean_distance(&self) -> f64 {
        if self.num_vehicles == 0 {
            0.0
        } else {
            self.total_distance / self.num_vehicles as f64
        }
    }
}

/// Straight-line metrics of a solution.
///
/// Each route is measured in its depot-framed form; stops are the entries
/// that are not the depot.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_routeplan::evaluation::evaluate_routes;
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::models::{RouteForm, Solution};
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(3, 3)).unwrap();
/// let mut routes = BTreeMap::new();
/// routes.insert("T1".to_string(), vec!["N0_0".to_string(), "N2_2".to_string()]);
/// let sol = Solution::new("N1_1", RouteForm::StopOnly, routes);
///
/// let m = evaluate_routes(&g, &sol);
/// assert!((m.total_distance - 4.0 * 2f64.sqrt()).abs() < 1e-10);
/// assert_eq!(m.num_stops, 2);
/// ```
pub fn evaluate_routes(graph: &SpatialGraph, solution: &Solution) -> RouteMetrics {
    let framed = solution.depot_framed();
    let distance_per_vehicle: BTreeMap<String, f64> = framed
        .routes()
        .iter()
        .map(|(vehicle_id, route)| (vehicle_id.clone(), path_distance(graph, route)))
        .collect();

    RouteMetrics {
        total_distance: distance_per_vehicle.values().sum(),
        num_vehicles: framed.num_routes(),
        num_stops: framed.num_stops(),
        distance_per_vehicle,
    }
}

/// Metrics of expanded full paths.
///
/// Distances follow every hop of the path. Stops count each path's length
/// minus its two depot endpoints, so pass-through locations are counted
/// too.
pub fn evaluate_full_paths(
    graph: &SpatialGraph,
    paths: &BTreeMap<String, Vec<String>>,
) -> RouteMetrics {
    let distance_per_vehicle: BTreeMap<String, f64> = paths
        .iter()
        .map(|(vehicle_id, path)| (vehicle_id.clone(), path_distance(graph, path)))
        .collect();

    RouteMetrics {
        total_distance: distance_per_vehicle.values().sum(),
        num_vehicles: paths.len(),
        num_stops: paths.values().map(|p| p.len().saturating_sub(2)).sum(),
        distance_per_vehicle,
    }
}
