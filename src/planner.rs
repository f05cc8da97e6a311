//! End-to-end planning pipeline.
//!
//! [`RoutePlanner`] ties the stages together for one graph and depot:
//! construction, 2-opt refinement, simulated annealing, full-path expansion
//! and evaluation. [`RoutePlanner::plan`] runs the whole pipeline and
//! returns a [`PlanReport`] comparing the three solutions.
//!
//! Both optimizers start from the construction output, so the 2-opt and
//! annealing results are independent alternatives rather than a chain.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use u_numflow::random::create_rng;

use crate::annealing::{self, AnnealingConfig, AnnealingOutcome};
use crate::constructive::{build_initial_solution, CapacityReport};
use crate::error::{PlanError, Result};
use crate::evaluation::{evaluate_full_paths, evaluate_routes, expand_to_full_paths, RouteMetrics};
use crate::graph::SpatialGraph;
use crate::local_search::{two_opt_solution, TwoOptConfig};
use crate::models::{DemandSite, Solution, Vehicle};

/// Settings for a full planning run.
///
/// Every field has a default, so a partial document deserializes.
///
/// # Examples
///
/// ```
/// use u_routeplan::planner::PlannerConfig;
///
/// let config = PlannerConfig::default().with_seed(7);
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.two_opt.max_iterations, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// 2-opt refinement settings.
    pub two_opt: TwoOptConfig,
    /// Annealing schedule.
    pub annealing: AnnealingConfig,
    /// Seed of the annealing random number generator.
    pub seed: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            two_opt: TwoOptConfig::default(),
            annealing: AnnealingConfig::default(),
            seed: 42,
        }
    }
}

impl PlannerConfig {
    pub fn with_two_opt(mut self, config: TwoOptConfig) -> Self {
        self.two_opt = config;
        self
    }

    pub fn with_annealing(mut self, config: AnnealingConfig) -> Self {
        self.annealing = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates both stage configurations.
    pub fn validate(&self) -> Result<()> {
        self.two_opt.validate()?;
        self.annealing.validate()
    }
}

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nearest-feasible construction.
    Initial,
    /// 2-opt applied to the construction output.
    TwoOpt,
    /// Simulated annealing applied to the construction output.
    Annealed,
}

/// The outcome of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    /// Depot-framed solution.
    pub solution: Solution,
    /// Straight-line metrics of `solution`.
    pub metrics: RouteMetrics,
    /// Turn-by-turn paths per vehicle.
    pub full_paths: BTreeMap<String, Vec<String>>,
    /// Metrics of `full_paths`: the distance actually driven on the graph.
    pub full_path_metrics: RouteMetrics,
    /// Load bookkeeping of `solution`.
    pub capacity: CapacityReport,
}

/// Results of [`RoutePlanner::plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub initial: StageReport,
    pub two_opt: StageReport,
    pub annealed: StageReport,
    /// Cost trace of the annealing run, one entry per temperature level.
    pub annealing_history: Vec<f64>,
}

impl PlanReport {
    /// Report of the given stage.
    pub fn stage(&self, stage: Stage) -> &StageReport {
        match stage {
            Stage::Initial => &self.initial,
            Stage::TwoOpt => &self.two_opt,
            Stage::Annealed => &self.annealed,
        }
    }

    /// Distance reduction of `stage` relative to the initial solution, in
    /// percent. Zero when the initial distance is zero.
    pub fn improvement_pct(&self, stage: Stage) -> f64 {
        let base = self.initial.metrics.total_distance;
        if base == 0.0 {
            return 0.0;
        }
        (base - self.stage(stage).metrics.total_distance) / base * 100.0
    }

    /// Stage with the shortest total distance.
    ///
    /// Ties go to annealing first, then 2-opt.
    pub fn best_stage(&self) -> Stage {
        let best = [Stage::Initial, Stage::TwoOpt, Stage::Annealed]
            .iter()
            .map(|&s| self.stage(s).metrics.total_distance)
            .fold(f64::INFINITY, f64::min);
        if self.annealed.metrics.total_distance == best {
            Stage::Annealed
        } else if self.two_opt.metrics.total_distance == best {
            Stage::TwoOpt
        } else {
            Stage::Initial
        }
    }

    /// Report of [`best_stage`](Self::best_stage).
    pub fn best(&self) -> &StageReport {
        self.stage(self.best_stage())
    }
}

/// Facade over one graph and depot.
///
/// # Examples
///
/// ```
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::models::{DemandSite, Vehicle};
/// use u_routeplan::annealing::AnnealingConfig;
/// use u_routeplan::planner::{PlannerConfig, RoutePlanner, Stage};
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(6, 6)).unwrap();
/// let planner = RoutePlanner::new(&g, "N0_0").unwrap();
/// let sites = vec![
///     DemandSite::new("S1", "N5_5", 10.0),
///     DemandSite::new("S2", "N0_5", 10.0),
///     DemandSite::new("S3", "N5_0", 10.0),
/// ];
/// let vehicles = vec![Vehicle::new("T1", 30.0)];
///
/// let config = PlannerConfig::default()
///     .with_annealing(AnnealingConfig::default().with_cooling_rate(0.9));
/// let report = planner.plan(&sites, &vehicles, &config).unwrap();
/// assert!(report.improvement_pct(report.best_stage()) >= 0.0);
/// assert_eq!(report.stage(Stage::TwoOpt).metrics.num_stops, 3);
/// ```
#[derive(Debug, Clone)]
pub struct RoutePlanner<'a> {
    graph: &'a SpatialGraph,
    depot: String,
}

impl<'a> RoutePlanner<'a> {
    /// Creates a planner.
    ///
    /// Fails with [`PlanError::UnknownLocation`] if the depot is not in the
    /// graph.
    pub fn new(graph: &'a SpatialGraph, depot: impl Into<String>) -> Result<Self> {
        let depot = depot.into();
        if !graph.contains(&depot) {
            return Err(PlanError::UnknownLocation(depot));
        }
        Ok(Self { graph, depot })
    }

    pub fn graph(&self) -> &SpatialGraph {
        self.graph
    }

    pub fn depot(&self) -> &str {
        &self.depot
    }

    /// Stop-only construction output, see [`build_initial_solution`].
    pub fn initial_solution(&self, sites: &[DemandSite], vehicles: &[Vehicle]) -> Result<Solution> {
        build_initial_solution(self.graph, sites, &self.depot, vehicles)
    }

    /// Depot-framed 2-opt refinement, see [`two_opt_solution`].
    pub fn refine(&self, solution: &Solution, config: &TwoOptConfig) -> Result<Solution> {
        two_opt_solution(self.graph, solution, config)
    }

    /// Fleet-wide annealing, see [`annealing::anneal`].
    pub fn anneal<R: Rng>(
        &self,
        solution: &Solution,
        sites: &[DemandSite],
        vehicles: &[Vehicle],
        config: &AnnealingConfig,
        rng: &mut R,
    ) -> Result<AnnealingOutcome> {
        annealing::anneal(self.graph, solution, sites, vehicles, config, rng)
    }

    /// Turn-by-turn paths, see [`expand_to_full_paths`].
    pub fn full_paths(&self, solution: &Solution) -> BTreeMap<String, Vec<String>> {
        expand_to_full_paths(self.graph, solution)
    }

    /// Straight-line metrics, see [`evaluate_routes`].
    pub fn evaluate(&self, solution: &Solution) -> RouteMetrics {
        evaluate_routes(self.graph, solution)
    }

    /// Runs construction, then 2-opt and annealing on the construction
    /// output, and evaluates all three.
    ///
    /// The annealer's RNG is seeded from `config.seed`.
    pub fn plan(
        &self,
        sites: &[DemandSite],
        vehicles: &[Vehicle],
        config: &PlannerConfig,
    ) -> Result<PlanReport> {
        config.validate()?;

        let initial = self.initial_solution(sites, vehicles)?.depot_framed();
        let refined = self.refine(&initial, &config.two_opt)?;

        let mut rng = create_rng(config.seed);
        let outcome = self.anneal(&initial, sites, vehicles, &config.annealing, &mut rng)?;

        let initial = self.stage_report(initial, sites, vehicles, Stage::Initial);
        let two_opt = self.stage_report(refined, sites, vehicles, Stage::TwoOpt);
        let annealed = self.stage_report(outcome.solution, sites, vehicles, Stage::Annealed);

        let report = PlanReport {
            initial,
            two_opt,
            annealed,
            annealing_history: outcome.cost_history,
        };
        debug!(
            initial = report.initial.metrics.total_distance,
            two_opt = report.two_opt.metrics.total_distance,
            annealed = report.annealed.metrics.total_distance,
            best = ?report.best_stage(),
            "plan finished"
        );
        Ok(report)
    }

    fn stage_report(
        &self,
        solution: Solution,
        sites: &[DemandSite],
        vehicles: &[Vehicle],
        stage: Stage,
    ) -> StageReport {
        let capacity = CapacityReport::new(&solution, sites, vehicles);
        if capacity.has_overload() {
            warn!(?stage, vehicles = ?capacity.overloaded, "vehicle load exceeds capacity");
        }
        let full_paths = self.full_paths(&solution);
        StageReport {
            metrics: self.evaluate(&solution),
            full_path_metrics: evaluate_full_paths(self.graph, &full_paths),
            full_paths,
            capacity,
            solution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GridSpec;
    use crate::models::RouteForm;

    fn fast() -> PlannerConfig {
        PlannerConfig::default().with_annealing(
            AnnealingConfig::default()
                .with_cooling_rate(0.9)
                .with_iterations_per_temperature(50),
        )
    }

    fn scenario() -> (SpatialGraph, Vec<DemandSite>, Vec<Vehicle>) {
        let spec = GridSpec::new(10, 10).with_obstacles(vec![(4, 4), (4, 5), (5, 4), (5, 5)]);
        let g = SpatialGraph::from_grid(&spec).unwrap();
        let sites = vec![
            DemandSite::new("S1", "N0_9", 15.0),
            DemandSite::new("S2", "N9_0", 20.0),
            DemandSite::new("S3", "N9_9", 10.0),
            DemandSite::new("S4", "N2_7", 25.0),
            DemandSite::new("S5", "N7_2", 15.0),
            DemandSite::new("S6", "N3_3", 10.0),
            DemandSite::new("S7", "N6_6", 20.0),
        ];
        let vehicles = vec![Vehicle::new("T1", 60.0), Vehicle::new("T2", 60.0)];
        (g, sites, vehicles)
    }

    #[test]
    fn test_unknown_depot() {
        let (g, _, _) = scenario();
        assert_eq!(
            RoutePlanner::new(&g, "N4_4").unwrap_err(),
            PlanError::UnknownLocation("N4_4".into())
        );
    }

    #[test]
    fn test_plan_stages() {
        let (g, sites, vehicles) = scenario();
        let planner = RoutePlanner::new(&g, "N0_0").unwrap();
        let report = planner.plan(&sites, &vehicles, &fast()).unwrap();

        for stage in [Stage::Initial, Stage::TwoOpt, Stage::Annealed] {
            let r = report.stage(stage);
            assert_eq!(r.solution.form(), RouteForm::DepotFramed);
            assert_eq!(r.metrics.num_stops, 7, "{stage:?}");
            assert_eq!(r.metrics.num_vehicles, 2);
            assert!(r.capacity.is_complete());
            for path in r.full_paths.values() {
                assert_eq!(path.first().map(String::as_str), Some("N0_0"));
                assert_eq!(path.last().map(String::as_str), Some("N0_0"));
            }
        }

        let base = report.initial.metrics.total_distance;
        assert!(report.two_opt.metrics.total_distance <= base + 1e-9);
        assert!(report.annealed.metrics.total_distance <= base + 1e-9);
        assert!(report.improvement_pct(Stage::Initial).abs() < 1e-12);
        assert!(report.improvement_pct(report.best_stage()) >= 0.0);
        assert!(!report.annealing_history.is_empty());
    }

    #[test]
    fn test_full_path_metrics_reported() {
        let (g, sites, vehicles) = scenario();
        let planner = RoutePlanner::new(&g, "N0_0").unwrap();
        let report = planner.plan(&sites, &vehicles, &fast()).unwrap();

        for stage in [Stage::Initial, Stage::TwoOpt, Stage::Annealed] {
            let r = report.stage(stage);
            assert_eq!(r.full_path_metrics, evaluate_full_paths(&g, &r.full_paths));
            assert_eq!(r.full_path_metrics.num_vehicles, 2);
            // graph paths never beat the straight-line hops
            assert!(r.full_path_metrics.total_distance >= r.metrics.total_distance - 1e-9);
        }
        // the obstacle block forces at least one detour
        assert!(
            report.initial.full_path_metrics.total_distance
                > report.initial.metrics.total_distance + 1e-9
        );
    }

    #[test]
    fn test_plan_is_reproducible() {
        let (g, sites, vehicles) = scenario();
        let planner = RoutePlanner::new(&g, "N0_0").unwrap();
        let a = planner.plan(&sites, &vehicles, &fast()).unwrap();
        let b = planner.plan(&sites, &vehicles, &fast()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_two_opt_keeps_vehicle_membership() {
        let (g, sites, vehicles) = scenario();
        let planner = RoutePlanner::new(&g, "N0_0").unwrap();
        let report = planner.plan(&sites, &vehicles, &fast()).unwrap();
        for v in report.initial.solution.routes().keys() {
            let mut a = report.initial.solution.stops(v).unwrap().to_vec();
            let mut b = report.two_opt.solution.stops(v).unwrap().to_vec();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_best_stage_tie_prefers_annealing() {
        let g = SpatialGraph::from_grid(&GridSpec::new(3, 3)).unwrap();
        let planner = RoutePlanner::new(&g, "N1_1").unwrap();
        let sites = vec![
            DemandSite::new("S1", "N0_0", 10.0),
            DemandSite::new("S2", "N2_2", 10.0),
        ];
        let report = planner
            .plan(&sites, &[Vehicle::new("T1", 50.0)], &fast())
            .unwrap();

        // every order of two opposite corners costs 4 * sqrt(2)
        let expected = 4.0 * 2f64.sqrt();
        assert_eq!(
            report.initial.solution.route("T1").unwrap(),
            ["N1_1", "N0_0", "N2_2", "N1_1"]
        );
        assert_eq!(report.two_opt.solution, report.initial.solution);
        assert!((report.initial.metrics.total_distance - expected).abs() < 1e-10);
        assert!((report.annealed.metrics.total_distance - expected).abs() < 1e-10);
        assert_eq!(report.best_stage(), Stage::Annealed);
        assert_eq!(report.best(), &report.annealed);
    }

    #[test]
    fn test_zero_distance_improvement() {
        let g = SpatialGraph::from_grid(&GridSpec::new(2, 2)).unwrap();
        let planner = RoutePlanner::new(&g, "N0_0").unwrap();
        let report = planner
            .plan(&[], &[Vehicle::new("T1", 10.0)], &fast())
            .unwrap();
        assert_eq!(report.initial.metrics.total_distance, 0.0);
        assert_eq!(report.improvement_pct(Stage::Annealed), 0.0);
        assert_eq!(report.best_stage(), Stage::Annealed);
    }

    #[test]
    fn test_invalid_config_rejected_before_work() {
        let (g, sites, vehicles) = scenario();
        let planner = RoutePlanner::new(&g, "N0_0").unwrap();
        let config = fast().with_annealing(AnnealingConfig::default().with_min_temperature(0.0));
        assert!(matches!(
            planner.plan(&sites, &vehicles, &config),
            Err(PlanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"seed": 9, "two_opt": {"max_iterations": 5}}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.two_opt.max_iterations, 5);
        assert!((config.two_opt.improvement_threshold - 0.001).abs() < 1e-12);
        assert_eq!(config.annealing, AnnealingConfig::default());
    }

    #[test]
    fn test_report_serializes() {
        let g = SpatialGraph::from_grid(&GridSpec::new(3, 3)).unwrap();
        let planner = RoutePlanner::new(&g, "N1_1").unwrap();
        let sites = vec![DemandSite::new("S1", "N0_0", 10.0)];
        let report = planner
            .plan(&sites, &[Vehicle::new("T1", 50.0)], &fast())
            .unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let back: PlanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.best_stage(), report.best_stage());
        assert_eq!(back.initial.solution, report.initial.solution);
    }
}
