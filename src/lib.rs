//! # u-routeplan
//!
//! Collection route planning for a capacity-limited fleet that leaves from
//! and returns to a shared depot, over locations on a spatial graph.
//!
//! ## Modules
//!
//! - [`models`]: domain types (Location, DemandSite, Vehicle, Solution, route framing)
//! - [`graph`]: spatial graph with Euclidean distances and a grid loader
//! - [`pathfinding`]: A* shortest paths
//! - [`distance`]: dense distance matrix over a subset of locations
//! - [`constructive`]: nearest-feasible-neighbor construction, capacity report
//! - [`local_search`]: intra-route 2-opt
//! - [`annealing`]: fleet-wide simulated annealing
//! - [`evaluation`]: full-path expansion and distance metrics
//! - [`planner`]: pipeline facade and stage reports
//!
//! ## Example
//!
//! ```
//! use u_routeplan::graph::{GridSpec, SpatialGraph};
//! use u_routeplan::models::{DemandSite, Vehicle};
//! use u_routeplan::planner::{PlannerConfig, RoutePlanner};
//! use u_routeplan::annealing::AnnealingConfig;
//!
//! let grid = GridSpec::new(5, 5).with_obstacles(vec![(2, 2)]);
//! let graph = SpatialGraph::from_grid(&grid).unwrap();
//! let planner = RoutePlanner::new(&graph, "N0_0").unwrap();
//!
//! let sites = vec![
//!     DemandSite::new("S1", "N4_4", 20.0),
//!     DemandSite::new("S2", "N0_4", 15.0),
//!     DemandSite::new("S3", "N4_0", 10.0),
//! ];
//! let vehicles = vec![Vehicle::new("T1", 30.0), Vehicle::new("T2", 30.0)];
//!
//! let config = PlannerConfig::default()
//!     .with_annealing(AnnealingConfig::default().with_cooling_rate(0.9));
//! let report = planner.plan(&sites, &vehicles, &config).unwrap();
//! assert!(report.initial.capacity.is_complete());
//! println!("best: {:?}", report.best_stage());
//! ```

pub mod annealing;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod local_search;
pub mod models;
pub mod pathfinding;
pub mod planner;

pub use error::{PlanError, Result};
