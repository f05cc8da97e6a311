//! Error type shared by all planning stages.

use thiserror::Error;

/// Configuration errors raised while building inputs or running a stage.
///
/// An unreachable goal is not an error: the pathfinder reports it as `None`
/// and callers fall back to a direct segment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A location with this id is already registered.
    #[error("location `{0}` already exists")]
    DuplicateLocation(String),

    /// A referenced location id is not part of the graph.
    #[error("unknown location `{0}`")]
    UnknownLocation(String),

    /// Edge weights must be positive and finite.
    #[error("invalid weight {weight} on edge `{from}` - `{to}`")]
    InvalidWeight {
        /// First endpoint.
        from: String,
        /// Second endpoint.
        to: String,
        /// Rejected weight.
        weight: f64,
    },

    /// A stage configuration is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PlanError::DuplicateLocation("N0_0".into()).to_string(),
            "location `N0_0` already exists"
        );
        assert_eq!(
            PlanError::UnknownLocation("X".into()).to_string(),
            "unknown location `X`"
        );
        assert_eq!(
            PlanError::InvalidConfig("cooling_rate must be in (0, 1)".into()).to_string(),
            "invalid configuration: cooling_rate must be in (0, 1)"
        );
    }
}
