//! Fleet routing as an SA problem.

use rand::Rng;
use u_metaheur::sa::SaProblem;

use super::config::CapacityPolicy;
use super::flat::FlatSolution;
use crate::error::{PlanError, Result};
use crate::graph::SpatialGraph;
use crate::models::{DemandSite, Solution, Vehicle};

/// Neighborhood and cost of the fleet annealer.
///
/// Wraps a starting [`FlatSolution`] together with the graph and the
/// per-segment capacities. [`anneal`](super::anneal) drives it with its own
/// schedule; it also implements [`SaProblem`] so the generic
/// [`u_metaheur::sa::SaRunner`] can run it.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use u_metaheur::sa::SaRunner;
/// use u_routeplan::annealing::{AnnealingConfig, FleetAnnealing};
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::models::{RouteForm, Solution, Vehicle};
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(4, 4)).unwrap();
/// let mut routes = BTreeMap::new();
/// routes.insert("T1".to_string(), vec!["N3_3".into(), "N0_1".into(), "N3_2".into()]);
/// let sol = Solution::new("N0_0", RouteForm::StopOnly, routes);
/// let vehicles = vec![Vehicle::new("T1", 100.0)];
///
/// let config = AnnealingConfig::default().with_cooling_rate(0.9);
/// let problem = FleetAnnealing::new(&g, &sol, &[], &vehicles, config.capacity_policy).unwrap();
/// let result = SaRunner::run(&problem, &config.to_sa_config(42));
/// assert!(result.best_cost <= problem.initial_cost() + 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct FleetAnnealing<'a> {
    graph: &'a SpatialGraph,
    start: FlatSolution,
    capacities: Vec<f64>,
    policy: CapacityPolicy,
}

impl<'a> FleetAnnealing<'a> {
    /// Prepares the problem from a solution of either form.
    ///
    /// # Errors
    ///
    /// [`PlanError::UnknownLocation`] for ids missing from the graph. With
    /// [`CapacityPolicy::Enforce`], [`PlanError::InvalidConfig`] if a route
    /// belongs to a vehicle not listed in `vehicles`.
    pub fn new(
        graph: &'a SpatialGraph,
        solution: &Solution,
        sites: &[DemandSite],
        vehicles: &[Vehicle],
        policy: CapacityPolicy,
    ) -> Result<Self> {
        let start = FlatSolution::from_solution(graph, solution, sites)?;

        let mut capacities = Vec::with_capacity(solution.num_routes());
        for vehicle_id in solution.routes().keys() {
            match vehicles.iter().find(|v| v.id() == vehicle_id) {
                Some(v) => capacities.push(v.capacity()),
                None if policy == CapacityPolicy::Enforce => {
                    return Err(PlanError::InvalidConfig(format!(
                        "route for unknown vehicle `{vehicle_id}`"
                    )));
                }
                None => capacities.push(f64::INFINITY),
            }
        }

        Ok(Self {
            graph,
            start,
            capacities,
            policy,
        })
    }

    /// The flattened starting solution.
    pub fn start(&self) -> &FlatSolution {
        &self.start
    }

    /// Cost of the starting solution.
    pub fn initial_cost(&self) -> f64 {
        self.start.cost(self.graph)
    }

    /// Proposes a perturbed copy of `current`.
    ///
    /// Returns `None` when the capacity policy rules the move out.
    pub fn propose<R: Rng>(&self, current: &FlatSolution, rng: &mut R) -> Option<FlatSolution> {
        let mut next = current.clone();
        next.perturb(rng);
        match self.policy {
            CapacityPolicy::Ignore => Some(next),
            CapacityPolicy::Enforce => self.respects_capacity(current, &next).then_some(next),
        }
    }

    fn respects_capacity(&self, current: &FlatSolution, next: &FlatSolution) -> bool {
        const TOLERANCE: f64 = 1e-9;
        let before = current.segment_loads();
        next.segment_loads()
            .iter()
            .zip(&before)
            .zip(&self.capacities)
            .all(|((&load, &prev), &cap)| load <= cap.max(prev) + TOLERANCE)
    }

    /// Turns a flattened solution back into a [`Solution`] shaped like
    /// `template`.
    pub fn to_solution(&self, flat: &FlatSolution, template: &Solution) -> Solution {
        flat.to_solution(self.graph, template)
    }
}

impl SaProblem for FleetAnnealing<'_> {
    type Solution = FlatSolution;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> FlatSolution {
        self.start.clone()
    }

    fn cost(&self, solution: &FlatSolution) -> f64 {
        solution.cost(self.graph)
    }

    fn neighbor<R: Rng>(&self, solution: &FlatSolution, rng: &mut R) -> FlatSolution {
        self.propose(solution, rng)
            .unwrap_or_else(|| solution.clone())
    }
}
