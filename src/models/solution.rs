//! Solution type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::route::{depot_framing, strip_depot_framing, strip_route, RouteForm};

/// A complete assignment of routes to vehicles.
///
/// Routes are keyed by vehicle id and stored as location ids, either
/// stop-only or depot-framed (see [`RouteForm`]). Demand sites the
/// construction heuristic could not place are kept in `unassigned`.
///
/// Every optimization stage returns a new `Solution`; converting between
/// forms also returns a new value.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_routeplan::models::{RouteForm, Solution};
///
/// let mut routes = BTreeMap::new();
/// routes.insert("T1".to_string(), vec!["A".to_string(), "B".to_string()]);
/// let sol = Solution::new("D", RouteForm::StopOnly, routes);
///
/// let framed = sol.depot_framed();
/// assert_eq!(framed.route("T1").unwrap(), ["D", "A", "B", "D"]);
/// assert_eq!(framed.stop_only().routes(), sol.routes());
/// assert_eq!(sol.num_stops(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    depot: String,
    form: RouteForm,
    routes: BTreeMap<String, Vec<String>>,
    unassigned: Vec<String>,
}

impl Solution {
    /// Creates a solution from routes in the given form.
    pub fn new(
        depot: impl Into<String>,
        form: RouteForm,
        routes: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            depot: depot.into(),
            form,
            routes,
            unassigned: Vec::new(),
        }
    }

    /// Records demand-site ids that no route serves.
    pub fn with_unassigned(mut self, unassigned: Vec<String>) -> Self {
        self.unassigned = unassigned;
        self
    }

    /// Depot location id.
    pub fn depot(&self) -> &str {
        &self.depot
    }

    /// Representation of the stored routes.
    pub fn form(&self) -> RouteForm {
        self.form
    }

    /// Routes keyed by vehicle id, in the stored form.
    pub fn routes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.routes
    }

    /// Route of one vehicle, in the stored form.
    pub fn route(&self, vehicle_id: &str) -> Option<&[String]> {
        self.routes.get(vehicle_id).map(Vec::as_slice)
    }

    /// Demand stops of one vehicle, depot excluded, whatever the form.
    pub fn stops(&self, vehicle_id: &str) -> Option<&[String]> {
        let route = self.routes.get(vehicle_id)?;
        Some(match self.form {
            RouteForm::StopOnly => route.as_slice(),
            RouteForm::DepotFramed => strip_route(route),
        })
    }

    /// Demand-site ids left out by construction.
    pub fn unassigned(&self) -> &[String] {
        &self.unassigned
    }

    /// Number of sites left out by construction.
    pub fn num_unassigned(&self) -> usize {
        self.unassigned.len()
    }

    /// Number of vehicles with a route entry (empty routes included).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of route entries that are not the depot.
    pub fn num_stops(&self) -> usize {
        self.routes
            .values()
            .map(|r| r.iter().filter(|id| **id != self.depot).count())
            .sum()
    }

    /// Returns this solution with depot-framed routes.
    pub fn depot_framed(&self) -> Solution {
        match self.form {
            RouteForm::DepotFramed => self.clone(),
            RouteForm::StopOnly => Solution {
                depot: self.depot.clone(),
                form: RouteForm::DepotFramed,
                routes: depot_framing(&self.routes, &self.depot),
                unassigned: self.unassigned.clone(),
            },
        }
    }

    /// Returns this solution with stop-only routes.
    pub fn stop_only(&self) -> Solution {
        match self.form {
            RouteForm::StopOnly => self.clone(),
            RouteForm::DepotFramed => Solution {
                depot: self.depot.clone(),
                form: RouteForm::StopOnly,
                routes: strip_depot_framing(&self.routes),
                unassigned: self.unassigned.clone(),
            },
        }
    }

    /// Returns a solution in `form` with the same depot and unassigned list.
    pub(crate) fn with_routes(&self, form: RouteForm, routes: BTreeMap<String, Vec<String>>) -> Solution {
        Solution {
            depot: self.depot.clone(),
            form,
            routes,
            unassigned: self.unassigned.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Solution {
        let mut routes = BTreeMap::new();
        routes.insert("T1".to_string(), ids(&["A", "B"]));
        routes.insert("T2".to_string(), ids(&["C"]));
        routes.insert("T3".to_string(), Vec::new());
        Solution::new("D", RouteForm::StopOnly, routes)
    }

    #[test]
    fn test_solution_counts() {
        let sol = sample();
        assert_eq!(sol.num_routes(), 3);
        assert_eq!(sol.num_stops(), 3);
        assert_eq!(sol.num_unassigned(), 0);
        assert_eq!(sol.form(), RouteForm::StopOnly);
    }

    #[test]
    fn test_depot_framed_conversion() {
        let framed = sample().depot_framed();
        assert_eq!(framed.form(), RouteForm::DepotFramed);
        assert_eq!(framed.route("T1").unwrap(), &ids(&["D", "A", "B", "D"])[..]);
        assert_eq!(framed.route("T3").unwrap(), &ids(&["D", "D"])[..]);
        assert_eq!(framed.num_stops(), 3);
        assert_eq!(framed.stops("T1").unwrap(), &ids(&["A", "B"])[..]);
    }

    #[test]
    fn test_round_trip_keeps_unassigned() {
        let sol = sample().with_unassigned(ids(&["S9"]));
        let back = sol.depot_framed().stop_only();
        assert_eq!(back, sol);
        assert_eq!(back.unassigned(), &ids(&["S9"])[..]);
    }

    #[test]
    fn test_conversion_is_identity_on_same_form() {
        let sol = sample();
        assert_eq!(sol.stop_only(), sol);
        let framed = sol.depot_framed();
        assert_eq!(framed.depot_framed(), framed);
    }

    #[test]
    fn test_unknown_vehicle() {
        assert!(sample().route("T9").is_none());
        assert!(sample().stops("T9").is_none());
    }
}
