//! Constructive heuristics for building initial collection routes.
//!
//! - [`build_initial_solution`]: greedy nearest-feasible-neighbor, O(n²)
//! - [`CapacityReport`]: assigned-versus-total demand and vehicle loads

mod capacity;
mod nearest_feasible;

pub use capacity::CapacityReport;
pub use nearest_feasible::build_initial_solution;
