//! Simulated annealing over the whole fleet.
//!
//! The routes of all vehicles are concatenated into one [`FlatSolution`]
//! with fixed per-vehicle boundaries. Swap and relocate moves act on
//! positions of that sequence, so a stop can change vehicle when it crosses
//! a boundary. Capacity is not checked unless
//! [`CapacityPolicy::Enforce`] is selected.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod flat;
mod problem;
mod runner;

pub use config::{AnnealingConfig, CapacityPolicy};
pub use flat::{FlatSolution, FlatStop};
pub use problem::FleetAnnealing;
pub use runner::{anneal, AnnealingOutcome};
