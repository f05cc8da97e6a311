//! Annealing loop over the flattened fleet.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::config::AnnealingConfig;
use super::problem::FleetAnnealing;
use crate::error::Result;
use crate::graph::SpatialGraph;
use crate::models::{DemandSite, Solution, Vehicle};

/// Result of an annealing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingOutcome {
    /// Best solution found, in the input's route form.
    pub solution: Solution,

    /// Total distance of the input solution.
    pub initial_cost: f64,

    /// Total distance of `solution`.
    pub best_cost: f64,

    /// Number of neighbors tried.
    pub iterations: usize,

    /// Neighbors that replaced the current solution (improving included).
    pub accepted_moves: usize,

    /// Neighbors strictly cheaper than the current solution.
    pub improving_moves: usize,

    /// Temperature when the schedule stopped.
    pub final_temperature: f64,

    /// Best cost before the first temperature level and after each one.
    pub cost_history: Vec<f64>,
}

/// Improves a solution with simulated annealing over the whole fleet.
///
/// Routes are flattened in ascending vehicle-id order with fixed segment
/// boundaries (see [`FlatSolution`](super::FlatSolution)). At each
/// temperature level `iterations_per_temperature` neighbors are drawn with
/// [`FlatSolution::perturb`](super::FlatSolution::perturb). A cheaper
/// neighbor is always accepted; otherwise one uniform draw `v` accepts it
/// when `v < exp(-delta / T)`. The best solution seen is kept apart from
/// the current one and returned.
///
/// All randomness comes from `rng`, so a fixed seed reproduces the run.
///
/// With [`CapacityPolicy::Enforce`](super::CapacityPolicy::Enforce),
/// neighbors that overload a vehicle are skipped before the acceptance draw.
///
/// # Errors
///
/// [`PlanError::InvalidConfig`](crate::error::PlanError::InvalidConfig) for
/// an invalid configuration, plus the errors of [`FleetAnnealing::new`].
///
/// # Examples
///
/// ```
/// use u_numflow::random::create_rng;
/// use u_routeplan::annealing::{anneal, AnnealingConfig};
/// use u_routeplan::constructive::build_initial_solution;
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::models::{DemandSite, Vehicle};
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(5, 5)).unwrap();
/// let sites = vec![
///     DemandSite::new("S1", "N0_4", 10.0),
///     DemandSite::new("S2", "N4_0", 10.0),
///     DemandSite::new("S3", "N4_4", 10.0),
/// ];
/// let vehicles = vec![Vehicle::new("T1", 20.0), Vehicle::new("T2", 20.0)];
/// let initial = build_initial_solution(&g, &sites, "N2_2", &vehicles).unwrap();
///
/// let config = AnnealingConfig::default().with_cooling_rate(0.9);
/// let mut rng = create_rng(42);
/// let outcome = anneal(&g, &initial, &sites, &vehicles, &config, &mut rng).unwrap();
/// assert!(outcome.best_cost <= outcome.initial_cost + 1e-9);
/// assert_eq!(outcome.solution.num_stops(), 3);
/// ```
pub fn anneal<R: Rng>(
    graph: &SpatialGraph,
    solution: &Solution,
    sites: &[DemandSite],
    vehicles: &[Vehicle],
    config: &AnnealingConfig,
    rng: &mut R,
) -> Result<AnnealingOutcome> {
    config.validate()?;
    let problem = FleetAnnealing::new(graph, solution, sites, vehicles, config.capacity_policy)?;

    let mut current = problem.start().clone();
    let mut current_cost = current.cost(graph);
    let initial_cost = current_cost;
    let mut best = current.clone();
    let mut best_cost = current_cost;

    let mut temperature = config.initial_temperature;
    let mut iterations = 0usize;
    let mut accepted_moves = 0usize;
    let mut improving_moves = 0usize;
    let mut cost_history = vec![best_cost];

    debug!(
        stops = current.len(),
        vehicles = current.segments().len(),
        initial_cost,
        "start annealing"
    );

    while temperature > config.min_temperature {
        for _ in 0..config.iterations_per_temperature {
            iterations += 1;
            let Some(neighbor) = problem.propose(&current, rng) else {
                continue;
            };
            let neighbor_cost = neighbor.cost(graph);
            let delta = neighbor_cost - current_cost;

            // Metropolis criterion
            let improving = delta < 0.0;
            if improving || rng.random::<f64>() < (-delta / temperature).exp() {
                if improving {
                    improving_moves += 1;
                }
                accepted_moves += 1;
                current = neighbor;
                current_cost = neighbor_cost;

                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                    trace!(best_cost, temperature, iterations, "new best");
                }
            }
        }

        temperature *= config.cooling_rate;
        cost_history.push(best_cost);
    }

    debug!(
        initial_cost,
        best_cost,
        iterations,
        accepted_moves,
        final_temperature = temperature,
        "annealing done"
    );

    Ok(AnnealingOutcome {
        solution: problem.to_solution(&best, solution),
        initial_cost,
        best_cost,
        iterations,
        accepted_moves,
        improving_moves,
        final_temperature: temperature,
        cost_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annealing::CapacityPolicy;
    use crate::constructive::{build_initial_solution, CapacityReport};
    use crate::error::PlanError;
    use crate::evaluation::evaluate_routes;
    use crate::graph::GridSpec;
    use crate::models::RouteForm;
    use std::collections::BTreeMap;
    use u_numflow::random::create_rng;

    fn fast() -> AnnealingConfig {
        AnnealingConfig::default()
            .with_initial_temperature(50.0)
            .with_cooling_rate(0.9)
            .with_iterations_per_temperature(50)
            .with_min_temperature(0.1)
    }

    fn scenario() -> (SpatialGraph, Vec<DemandSite>, Vec<Vehicle>) {
        let g = SpatialGraph::from_grid(&GridSpec::new(8, 8)).unwrap();
        let sites = vec![
            DemandSite::new("S1", "N0_7", 10.0),
            DemandSite::new("S2", "N7_0", 15.0),
            DemandSite::new("S3", "N7_7", 10.0),
            DemandSite::new("S4", "N1_2", 20.0),
            DemandSite::new("S5", "N5_6", 5.0),
            DemandSite::new("S6", "N2_5", 10.0),
            DemandSite::new("S7", "N6_1", 10.0),
        ];
        let vehicles = vec![Vehicle::new("T1", 40.0), Vehicle::new("T2", 40.0)];
        (g, sites, vehicles)
    }

    #[test]
    fn test_best_not_worse_than_initial() {
        let (g, sites, vehicles) = scenario();
        let initial = build_initial_solution(&g, &sites, "N0_0", &vehicles).unwrap();
        let mut rng = create_rng(42);
        let outcome = anneal(&g, &initial, &sites, &vehicles, &fast(), &mut rng).unwrap();

        assert!(outcome.best_cost <= outcome.initial_cost + 1e-9);
        let eval = evaluate_routes(&g, &outcome.solution);
        assert!((eval.total_distance - outcome.best_cost).abs() < 1e-9);
        assert!((evaluate_routes(&g, &initial).total_distance - outcome.initial_cost).abs() < 1e-9);
    }

    #[test]
    fn test_keeps_form_and_stop_multiset() {
        let (g, sites, vehicles) = scenario();
        let initial = build_initial_solution(&g, &sites, "N0_0", &vehicles).unwrap();
        let framed = initial.depot_framed();
        let mut rng = create_rng(1);
        let outcome = anneal(&g, &framed, &sites, &vehicles, &fast(), &mut rng).unwrap();

        assert_eq!(outcome.solution.form(), RouteForm::DepotFramed);
        for route in outcome.solution.routes().values() {
            assert_eq!(route.first().map(String::as_str), Some("N0_0"));
            assert_eq!(route.last().map(String::as_str), Some("N0_0"));
        }
        let collect = |s: &Solution| {
            let mut all: Vec<String> = s
                .routes()
                .keys()
                .flat_map(|v| s.stops(v).unwrap_or_default().to_vec())
                .collect();
            all.sort();
            all
        };
        assert_eq!(collect(&outcome.solution), collect(&initial));
        // per-vehicle stop counts are fixed by the segment boundaries
        for v in initial.routes().keys() {
            assert_eq!(
                outcome.solution.stops(v).unwrap().len(),
                initial.stops(v).unwrap().len()
            );
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let (g, sites, vehicles) = scenario();
        let initial = build_initial_solution(&g, &sites, "N0_0", &vehicles).unwrap();
        let a = anneal(&g, &initial, &sites, &vehicles, &fast(), &mut create_rng(5)).unwrap();
        let b = anneal(&g, &initial, &sites, &vehicles, &fast(), &mut create_rng(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_schedule_counts() {
        let (g, sites, vehicles) = scenario();
        let initial = build_initial_solution(&g, &sites, "N0_0", &vehicles).unwrap();
        let config = fast();
        let steps = config.temperature_steps();
        let outcome = anneal(&g, &initial, &sites, &vehicles, &config, &mut create_rng(0)).unwrap();

        assert_eq!(outcome.iterations, steps * 50);
        assert_eq!(outcome.cost_history.len(), steps + 1);
        assert!(outcome.final_temperature <= 0.1);
        assert!(outcome.accepted_moves >= outcome.improving_moves);
        for w in outcome.cost_history.windows(2) {
            assert!(w[1] <= w[0] + 1e-12);
        }
    }

    #[test]
    fn test_no_trials_when_min_above_initial() {
        let (g, sites, vehicles) = scenario();
        let initial = build_initial_solution(&g, &sites, "N0_0", &vehicles).unwrap();
        let config = fast().with_min_temperature(100.0);
        let outcome = anneal(&g, &initial, &sites, &vehicles, &config, &mut create_rng(0)).unwrap();
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.solution, initial);
        assert_eq!(outcome.cost_history, vec![outcome.initial_cost]);
    }

    #[test]
    fn test_enforce_keeps_loads_within_capacity() {
        let (g, sites, vehicles) = scenario();
        let initial = build_initial_solution(&g, &sites, "N0_0", &vehicles).unwrap();
        assert!(!CapacityReport::new(&initial, &sites, &vehicles).has_overload());

        let config = fast().with_capacity_policy(CapacityPolicy::Enforce);
        for seed in 0..5 {
            let outcome = anneal(&g, &initial, &sites, &vehicles, &config, &mut create_rng(seed)).unwrap();
            let report = CapacityReport::new(&outcome.solution, &sites, &vehicles);
            assert!(!report.has_overload(), "seed {seed}: {:?}", report.load_per_vehicle);
        }
    }

    #[test]
    fn test_empty_solution() {
        let g = SpatialGraph::from_grid(&GridSpec::new(2, 2)).unwrap();
        let mut routes = BTreeMap::new();
        routes.insert("T1".to_string(), Vec::new());
        let sol = Solution::new("N0_0", RouteForm::StopOnly, routes);
        let outcome = anneal(&g, &sol, &[], &[], &fast(), &mut create_rng(0)).unwrap();
        assert_eq!(outcome.best_cost, 0.0);
        assert_eq!(outcome.improving_moves, 0);
        assert_eq!(outcome.solution, sol);
    }

    #[test]
    fn test_invalid_config() {
        let (g, sites, vehicles) = scenario();
        let initial = build_initial_solution(&g, &sites, "N0_0", &vehicles).unwrap();
        let config = fast().with_cooling_rate(1.0);
        assert!(matches!(
            anneal(&g, &initial, &sites, &vehicles, &config, &mut create_rng(0)),
            Err(PlanError::InvalidConfig(_))
        ));
    }
}
