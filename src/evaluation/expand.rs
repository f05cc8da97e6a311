//! Expansion of stop sequences into turn-by-turn graph paths.

use std::collections::BTreeMap;

use tracing::warn;

use crate::graph::SpatialGraph;
use crate::models::Solution;
use crate::pathfinding::find_path;

/// Expands every route into a full path through the graph.
///
/// Works on the depot-framed form, so each path starts and ends at the
/// depot. Consecutive stops are joined by [`find_path`]; when no path
/// exists the hop falls back to the direct pair `[a, b]`. Junction
/// locations appear once. A route with a single entry yields that entry.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_routeplan::evaluation::expand_to_full_paths;
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::models::{RouteForm, Solution};
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(3, 1)).unwrap();
/// let mut routes = BTreeMap::new();
/// routes.insert("T1".to_string(), vec!["N0_2".to_string()]);
/// let sol = Solution::new("N0_0", RouteForm::StopOnly, routes);
///
/// let paths = expand_to_full_paths(&g, &sol);
/// assert_eq!(paths["T1"], ["N0_0", "N0_1", "N0_2", "N0_1", "N0_0"]);
/// ```
pub fn expand_to_full_paths(
    graph: &SpatialGraph,
    solution: &Solution,
) -> BTreeMap<String, Vec<String>> {
    solution
        .depot_framed()
        .routes()
        .iter()
        .map(|(vehicle_id, route)| (vehicle_id.clone(), expand_route(graph, vehicle_id, route)))
        .collect()
}

fn expand_route(graph: &SpatialGraph, vehicle_id: &str, route: &[String]) -> Vec<String> {
    let Some(first) = route.first() else {
        return Vec::new();
    };
    let mut full = vec![first.clone()];
    for hop in route.windows(2) {
        let (a, b) = (&hop[0], &hop[1]);
        match find_path(graph, a, b) {
            Some(path) => full.extend(path.into_iter().skip(1)),
            None => {
                warn!(vehicle = vehicle_id, from = %a, to = %b, "no path found, using direct hop");
                full.push(b.clone());
            }
        }
    }
    full
}
