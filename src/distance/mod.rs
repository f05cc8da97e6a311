//! Precomputed straight-line distances.
//!
//! Provides a dense distance matrix over the locations an optimization
//! stage touches.

mod matrix;

pub use matrix::DistanceMatrix;
