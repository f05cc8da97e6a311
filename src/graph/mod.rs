//! Spatial graph of locations connected by weighted, undirected edges.
//!
//! - [`SpatialGraph`]: locations, adjacency, Euclidean distance queries
//! - [`GridSpec`]: rectangular grid loader with blocked cells

mod grid;
mod spatial;

pub use grid::GridSpec;
pub use spatial::SpatialGraph;
