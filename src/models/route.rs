//! Route representations and depot framing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How the routes of a [`Solution`](super::Solution) are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteForm {
    /// Demand-site locations only, depot excluded.
    StopOnly,
    /// Depot prepended and appended to the stop list.
    DepotFramed,
}

/// Prepends and appends the depot to every route.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_routeplan::models::depot_framing;
///
/// let mut routes = BTreeMap::new();
/// routes.insert("T1".to_string(), vec!["A".to_string(), "B".to_string()]);
/// let framed = depot_framing(&routes, "D");
/// assert_eq!(framed["T1"], vec!["D", "A", "B", "D"]);
/// ```
pub fn depot_framing(
    routes: &BTreeMap<String, Vec<String>>,
    depot: &str,
) -> BTreeMap<String, Vec<String>> {
    routes
        .iter()
        .map(|(vehicle, stops)| (vehicle.clone(), frame_route(stops, depot)))
        .collect()
}

/// Removes the first and last element of every route.
///
/// Inverse of [`depot_framing`].
pub fn strip_depot_framing(routes: &BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<String>> {
    routes
        .iter()
        .map(|(vehicle, route)| (vehicle.clone(), strip_route(route).to_vec()))
        .collect()
}

/// Returns `[depot] + stops + [depot]`.
pub fn frame_route(stops: &[String], depot: &str) -> Vec<String> {
    let mut framed = Vec::with_capacity(stops.len() + 2);
    framed.push(depot.to_string());
    framed.extend(stops.iter().cloned());
    framed.push(depot.to_string());
    framed
}

/// Returns the interior of a depot-framed route.
pub fn strip_route(route: &[String]) -> &[String] {
    if route.len() < 2 {
        return &[];
    }
    &route[1..route.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_frame_route() {
        assert_eq!(frame_route(&ids(&["A", "B"]), "D"), ids(&["D", "A", "B", "D"]));
        assert_eq!(frame_route(&[], "D"), ids(&["D", "D"]));
    }

    #[test]
    fn test_strip_route() {
        let framed = ids(&["D", "A", "D"]);
        assert_eq!(strip_route(&framed), &ids(&["A"])[..]);
        assert!(strip_route(&ids(&["D"])).is_empty());
        assert!(strip_route(&[]).is_empty());
    }

    #[test]
    fn test_framing_round_trip() {
        let mut routes = BTreeMap::new();
        routes.insert("T1".to_string(), ids(&["A", "B", "C"]));
        routes.insert("T2".to_string(), Vec::new());
        let framed = depot_framing(&routes, "D");
        assert_eq!(framed["T2"], ids(&["D", "D"]));
        assert_eq!(strip_depot_framing(&framed), routes);
    }
}
