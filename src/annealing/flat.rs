//! Flattened fleet representation used by the annealer.

use std::collections::{BTreeMap, HashMap, VecDeque};

use rand::Rng;

use crate::error::{PlanError, Result};
use crate::graph::SpatialGraph;
use crate::models::{sorted_by_location, DemandSite, RouteForm, Solution};

/// One visited stop: a graph location index and the demand collected there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatStop {
    /// Arena index of the stop's location in the graph.
    pub location: usize,
    /// Demand of the site served at this stop (`0.0` if none matches).
    pub demand: f64,
}

/// All routes of a solution concatenated into one sequence.
///
/// Vehicle routes are laid out in ascending vehicle-id order; `segments`
/// holds one half-open `(start, end)` range per vehicle into `stops`. The
/// ranges never change once built, so perturbations only move stops
/// between positions. A stop that crosses a range boundary changes vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatSolution {
    depot: usize,
    stops: Vec<FlatStop>,
    segments: Vec<(usize, usize)>,
}

impl FlatSolution {
    /// Flattens a solution of either form.
    ///
    /// Each stop carries the demand of the site it serves. Sites are matched
    /// by location, co-located sites in ascending site-id order.
    ///
    /// # Errors
    ///
    /// [`PlanError::UnknownLocation`] if the depot or a stop is not in the
    /// graph.
    pub fn from_solution(
        graph: &SpatialGraph,
        solution: &Solution,
        sites: &[DemandSite],
    ) -> Result<Self> {
        let depot = graph
            .index_of(solution.depot())
            .ok_or_else(|| PlanError::UnknownLocation(solution.depot().to_string()))?;

        let mut pending: HashMap<&str, VecDeque<f64>> = HashMap::new();
        for site in sorted_by_location(sites) {
            pending
                .entry(site.location_id())
                .or_default()
                .push_back(site.demand());
        }

        let mut stops = Vec::with_capacity(solution.num_stops());
        let mut segments = Vec::with_capacity(solution.num_routes());
        for vehicle_id in solution.routes().keys() {
            let start = stops.len();
            for id in solution.stops(vehicle_id).unwrap_or_default() {
                let location = graph
                    .index_of(id)
                    .ok_or_else(|| PlanError::UnknownLocation(id.clone()))?;
                let demand = pending
                    .get_mut(id.as_str())
                    .and_then(VecDeque::pop_front)
                    .unwrap_or(0.0);
                stops.push(FlatStop { location, demand });
            }
            segments.push((start, stops.len()));
        }

        Ok(Self {
            depot,
            stops,
            segments,
        })
    }

    /// Rebuilds a solution shaped like `template`.
    ///
    /// Vehicle ids come from the template in ascending order, the depot and
    /// unassigned list are kept, and the result has the template's form.
    pub fn to_solution(&self, graph: &SpatialGraph, template: &Solution) -> Solution {
        let routes: BTreeMap<String, Vec<String>> = template
            .routes()
            .keys()
            .zip(&self.segments)
            .map(|(vehicle_id, &(start, end))| {
                let route = self.stops[start..end]
                    .iter()
                    .map(|s| graph.id_at(s.location).to_string())
                    .collect();
                (vehicle_id.clone(), route)
            })
            .collect();

        let stop_only = template.with_routes(RouteForm::StopOnly, routes);
        match template.form() {
            RouteForm::StopOnly => stop_only,
            RouteForm::DepotFramed => stop_only.depot_framed(),
        }
    }

    /// Depot location index.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// The flattened stops.
    pub fn stops(&self) -> &[FlatStop] {
        &self.stops
    }

    /// Per-vehicle `(start, end)` ranges into [`stops`](Self::stops).
    pub fn segments(&self) -> &[(usize, usize)] {
        &self.segments
    }

    /// Total number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if no vehicle has a stop.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Total closed-tour distance: depot, each segment's stops, depot.
    ///
    /// Empty segments cost nothing.
    pub fn cost(&self, graph: &SpatialGraph) -> f64 {
        self.segments
            .iter()
            .map(|&(start, end)| self.segment_cost(graph, start, end))
            .sum()
    }

    fn segment_cost(&self, graph: &SpatialGraph, start: usize, end: usize) -> f64 {
        if start == end {
            return 0.0;
        }
        let mut total = 0.0;
        let mut prev = self.depot;
        for stop in &self.stops[start..end] {
            total += graph.distance_between(prev, stop.location);
            prev = stop.location;
        }
        total + graph.distance_between(prev, self.depot)
    }

    /// Demand carried by each segment.
    pub fn segment_loads(&self) -> Vec<f64> {
        self.segments
            .iter()
            .map(|&(start, end)| self.stops[start..end].iter().map(|s| s.demand).sum())
            .collect()
    }

    /// Applies one random move in place.
    ///
    /// With probability 0.5 two positions are drawn and swapped; otherwise a
    /// source and a target position are drawn and the stop at the source is
    /// removed and re-inserted at the target. Equal draws leave the sequence
    /// unchanged. Fewer than two stops means no move, though the move-type
    /// draw still happens.
    pub fn perturb<R: Rng>(&mut self, rng: &mut R) {
        let n = self.stops.len();
        let u: f64 = rng.random();
        if n < 2 {
            return;
        }
        if u < 0.5 {
            let a = rng.random_range(0..n);
            let b = rng.random_range(0..n);
            if a != b {
                self.stops.swap(a, b);
            }
        } else {
            let from = rng.random_range(0..n);
            let to = rng.random_range(0..n);
            if from != to {
                let stop = self.stops.remove(from);
                self.stops.insert(to, stop);
            }
        }
    }
}
