//! Full-path expansion and distance metrics.
//!
//! - [`expand_to_full_paths`]: stop sequences to graph paths via A*
//! - [`evaluate_routes`]: straight-line metrics of a solution
//! - [`evaluate_full_paths`]: metrics of expanded paths

mod expand;
mod metrics;

pub use expand::expand_to_full_paths;
pub use metrics::{evaluate_full_paths, evaluate_routes, RouteMetrics};
