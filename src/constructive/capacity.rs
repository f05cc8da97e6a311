//! Capacity bookkeeping for a solution.

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::models::{sorted_by_location, DemandSite, Solution, Vehicle};

const LOAD_TOLERANCE: f64 = 1e-9;

/// Assigned-versus-total demand and per-vehicle loads of a solution.
///
/// Construction drops sites that fit no vehicle and may overload a vehicle
/// in its leftover pass; the annealing stage may move sites across vehicles
/// without a capacity check. This report makes both visible.
///
/// Route entries are matched to sites by location. Co-located sites are
/// attributed in ascending site-id order, walking vehicles in id order.
///
/// # Examples
///
/// ```
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::models::{DemandSite, Vehicle};
/// use u_routeplan::constructive::{build_initial_solution, CapacityReport};
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(3, 1)).unwrap();
/// let sites = vec![
///     DemandSite::new("S1", "N0_1", 10.0),
///     DemandSite::new("S2", "N0_2", 90.0),
/// ];
/// let vehicles = vec![Vehicle::new("T1", 20.0)];
/// let sol = build_initial_solution(&g, &sites, "N0_0", &vehicles).unwrap();
///
/// let report = CapacityReport::new(&sol, &sites, &vehicles);
/// assert!(!report.is_complete());
/// assert_eq!(report.dropped, vec!["S2"]);
/// assert_eq!(report.assigned_demand, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReport {
    /// Sum of all site demands.
    pub total_demand: f64,
    /// Sum of demands served by some route.
    pub assigned_demand: f64,
    /// Ids of sites no route serves.
    pub dropped: Vec<String>,
    /// Load carried by each vehicle.
    pub load_per_vehicle: BTreeMap<String, f64>,
    /// Vehicles whose load exceeds their capacity.
    pub overloaded: Vec<String>,
}

impl CapacityReport {
    /// Builds the report for any solution form.
    pub fn new(solution: &Solution, sites: &[DemandSite], vehicles: &[Vehicle]) -> Self {
        let mut pending: HashMap<&str, VecDeque<&DemandSite>> = HashMap::new();
        for site in sorted_by_location(sites) {
            pending.entry(site.location_id()).or_default().push_back(site);
        }

        let mut load_per_vehicle = BTreeMap::new();
        for vehicle_id in solution.routes().keys() {
            let stops = solution.stops(vehicle_id).unwrap_or_default();
            let mut load = 0.0;
            for stop in stops {
                if let Some(site) = pending.get_mut(stop.as_str()).and_then(VecDeque::pop_front) {
                    load += site.demand();
                }
            }
            load_per_vehicle.insert(vehicle_id.clone(), load);
        }

        let mut dropped: Vec<String> = pending
            .into_values()
            .flatten()
            .map(|s| s.id().to_string())
            .collect();
        dropped.sort();

        let overloaded = vehicles
            .iter()
            .filter(|v| {
                load_per_vehicle
                    .get(v.id())
                    .is_some_and(|&load| load > v.capacity() + LOAD_TOLERANCE)
            })
            .map(|v| v.id().to_string())
            .collect();

        Self {
            total_demand: sites.iter().map(DemandSite::demand).sum(),
            assigned_demand: load_per_vehicle.values().sum(),
            dropped,
            load_per_vehicle,
            overloaded,
        }
    }

    /// Returns `true` if every site is served.
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }

    /// Returns `true` if some vehicle carries more than its capacity.
    pub fn has_overload(&self) -> bool {
        !self.overloaded.is_empty()
    }
}
