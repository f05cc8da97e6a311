//! Intra-route local search.
//!
//! - [`two_opt`]: first-improvement 2-opt on one depot-framed route
//! - [`two_opt_solution`]: 2-opt on every route of a solution

mod two_opt;

pub use two_opt::{two_opt, two_opt_solution, TwoOptConfig};
