//! Nearest-feasible-neighbor constructive heuristic.
//!
//! Builds routes greedily, one vehicle at a time in the given order:
//! starting from the depot with full capacity, always visit the nearest
//! unassigned demand site whose demand still fits. When nothing fits, the
//! next vehicle starts fresh at the depot.
//!
//! Sites left over after every vehicle has been filled go to the first
//! vehicle whose leftover budget still covers them. That budget starts at
//! the vehicle's *original* capacity and only shrinks by leftovers placed in
//! this pass, so a vehicle can end up loaded beyond its capacity. Sites that
//! fit no budget are dropped and listed in [`Solution::unassigned`]. Use
//! [`CapacityReport`](super::CapacityReport) to detect either outcome.
//!
//! Candidates are always scanned in ascending `(location id, site id)`
//! order and only a strictly shorter distance replaces the incumbent, so
//! ties resolve the same way on every run.
//!
//! # Complexity
//!
//! O(n²) where n = number of demand sites.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::distance::DistanceMatrix;
use crate::error::{PlanError, Result};
use crate::graph::SpatialGraph;
use crate::models::{sorted_by_location, DemandSite, RouteForm, Solution, Vehicle};

/// Constructs a stop-only solution with the nearest-feasible-neighbor rule.
///
/// Every vehicle gets a route entry, possibly empty.
///
/// # Errors
///
/// [`PlanError::UnknownLocation`] if the depot or a site location is not in
/// the graph. [`PlanError::InvalidConfig`] if two vehicles share an id, a
/// site sits on the depot, or a demand or capacity is not a positive number.
///
/// # Examples
///
/// ```
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::models::{DemandSite, Vehicle};
/// use u_routeplan::constructive::build_initial_solution;
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(3, 3)).unwrap();
/// let sites = vec![
///     DemandSite::new("S1", "N0_0", 10.0),
///     DemandSite::new("S2", "N2_2", 10.0),
/// ];
/// let vehicles = vec![Vehicle::new("T1", 50.0)];
///
/// let sol = build_initial_solution(&g, &sites, "N1_1", &vehicles).unwrap();
/// assert_eq!(sol.route("T1").unwrap(), ["N0_0", "N2_2"]);
/// assert_eq!(sol.num_unassigned(), 0);
/// ```
pub fn build_initial_solution(
    graph: &SpatialGraph,
    sites: &[DemandSite],
    depot: &str,
    vehicles: &[Vehicle],
) -> Result<Solution> {
    let depot_index = graph
        .index_of(depot)
        .ok_or_else(|| PlanError::UnknownLocation(depot.to_string()))?;

    let ordered = sorted_by_location(sites);
    let mut indices = Vec::with_capacity(ordered.len() + 1);
    indices.push(depot_index);
    for site in &ordered {
        if site.location_id() == depot {
            return Err(PlanError::InvalidConfig(format!(
                "demand site `{}` is located at the depot",
                site.id()
            )));
        }
        if !(site.demand() > 0.0 && site.demand().is_finite()) {
            return Err(PlanError::InvalidConfig(format!(
                "demand of site `{}` must be positive, got {}",
                site.id(),
                site.demand()
            )));
        }
        let i = graph
            .index_of(site.location_id())
            .ok_or_else(|| PlanError::UnknownLocation(site.location_id().to_string()))?;
        indices.push(i);
    }
    // local index 0 = depot, k + 1 = ordered[k]
    let distances = DistanceMatrix::from_indices(graph, &indices);

    let mut routes: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for vehicle in vehicles {
        if !(vehicle.capacity() > 0.0) {
            return Err(PlanError::InvalidConfig(format!(
                "capacity of vehicle `{}` must be positive, got {}",
                vehicle.id(),
                vehicle.capacity()
            )));
        }
        if routes.insert(vehicle.id().to_string(), Vec::new()).is_some() {
            return Err(PlanError::InvalidConfig(format!(
                "duplicate vehicle id `{}`",
                vehicle.id()
            )));
        }
    }

    debug!(
        sites = sites.len(),
        vehicles = vehicles.len(),
        "start nearest-feasible construction"
    );

    let n = ordered.len();
    let mut assigned = vec![false; n];
    let mut num_assigned = 0;

    for vehicle in vehicles {
        if num_assigned == n {
            break;
        }
        let route = routes.entry(vehicle.id().to_string()).or_default();
        let mut current = 0;
        let mut remaining = vehicle.capacity();

        loop {
            let mut best: Option<(usize, f64)> = None;
            for (k, site) in ordered.iter().enumerate() {
                if assigned[k] || site.demand() > remaining {
                    continue;
                }
                let d = distances.get(current, k + 1);
                if best.is_none_or(|(_, bd)| d < bd) {
                    best = Some((k, d));
                }
            }

            let Some((next, _)) = best else {
                break;
            };
            assigned[next] = true;
            num_assigned += 1;
            route.push(ordered[next].location_id().to_string());
            remaining -= ordered[next].demand();
            current = next + 1;
        }

        debug!(vehicle = vehicle.id(), stops = route.len(), remaining, "vehicle filled");
    }

    let mut budget: Vec<f64> = vehicles.iter().map(Vehicle::capacity).collect();
    let mut unassigned = Vec::new();
    for (k, site) in ordered.iter().enumerate() {
        if assigned[k] {
            continue;
        }
        match budget.iter().position(|&b| b >= site.demand()) {
            Some(v) => {
                budget[v] -= site.demand();
                routes
                    .entry(vehicles[v].id().to_string())
                    .or_default()
                    .push(site.location_id().to_string());
                debug!(site = site.id(), vehicle = vehicles[v].id(), "leftover site placed");
            }
            None => unassigned.push(site.id().to_string()),
        }
    }

    if !unassigned.is_empty() {
        warn!(
            dropped = unassigned.len(),
            sites = ?unassigned,
            "demand sites fit no vehicle and were left unassigned"
        );
    }

    Ok(Solution::new(depot, RouteForm::StopOnly, routes).with_unassigned(unassigned))
}
