//! Shortest paths between graph locations.
//!
//! - [`find_path`]: A* with a straight-line heuristic and FIFO tie-break
//! - [`path_distance`]: straight-line length of a location sequence
//! - [`path_cost`]: edge-weight length of a location sequence

mod astar;

pub use astar::{find_path, path_cost, path_distance};
