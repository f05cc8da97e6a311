//! Vehicle type with a load capacity.

use serde::{Deserialize, Serialize};

/// A collection vehicle.
///
/// Every vehicle starts and ends its route at the shared depot.
///
/// # Examples
///
/// ```
/// use u_routeplan::models::Vehicle;
///
/// let v = Vehicle::new("T1", 150.0);
/// assert_eq!(v.id(), "T1");
/// assert_eq!(v.capacity(), 150.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: String,
    capacity: f64,
}

impl Vehicle {
    /// Creates a vehicle with the given id and capacity.
    pub fn new(id: impl Into<String>, capacity: f64) -> Self {
        Self {
            id: id.into(),
            capacity,
        }
    }

    /// Vehicle id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}
