//! Location type.

use serde::{Deserialize, Serialize};

/// A named point in the plane.
///
/// Locations are the vertices of a [`SpatialGraph`](crate::graph::SpatialGraph).
/// They are immutable once created.
///
/// # Examples
///
/// ```
/// use u_routeplan::models::Location;
///
/// let a = Location::new("A", 0.0, 0.0);
/// let b = Location::new("B", 3.0, 4.0);
/// assert_eq!(a.id(), "A");
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: String,
    x: f64,
    y: f64,
}

impl Location {
    /// Creates a location.
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
        }
    }

    /// Unique location id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another location.
    pub fn distance_to(&self, other: &Location) -> f64 {
        self.distance_to_point(other.x, other.y)
    }

    /// Euclidean distance to an arbitrary coordinate.
    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_new() {
        let l = Location::new("N2_3", 3.0, 2.0);
        assert_eq!(l.id(), "N2_3");
        assert_eq!(l.x(), 3.0);
        assert_eq!(l.y(), 2.0);
    }

    #[test]
    fn test_location_distance_symmetric() {
        let a = Location::new("a", 1.0, 2.0);
        let b = Location::new("b", 4.0, 6.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-10);
    }

    #[test]
    fn test_distance_to_point() {
        let a = Location::new("a", 0.0, 0.0);
        assert!((a.distance_to_point(0.0, 2.0) - 2.0).abs() < 1e-10);
        assert_eq!(a.distance_to_point(0.0, 0.0), 0.0);
    }
}
