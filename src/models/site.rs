//! Demand site type.

use serde::{Deserialize, Serialize};

/// A location with a quantity of material waiting for collection.
///
/// # Examples
///
/// ```
/// use u_routeplan::models::DemandSite;
///
/// let s = DemandSite::new("S1", "N0_0", 25.0);
/// assert_eq!(s.id(), "S1");
/// assert_eq!(s.location_id(), "N0_0");
/// assert_eq!(s.demand(), 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSite {
    id: String,
    location_id: String,
    demand: f64,
}

impl DemandSite {
    /// Creates a demand site at the given graph location.
    pub fn new(id: impl Into<String>, location_id: impl Into<String>, demand: f64) -> Self {
        Self {
            id: id.into(),
            location_id: location_id.into(),
            demand,
        }
    }

    /// Site id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Graph location the site sits on.
    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    /// Quantity to collect.
    pub fn demand(&self) -> f64 {
        self.demand
    }
}

/// Sorts sites by `(location id, site id)`.
///
/// This is the fixed scan order used wherever several sites compete on
/// equal terms.
pub(crate) fn sorted_by_location(sites: &[DemandSite]) -> Vec<&DemandSite> {
    let mut ordered: Vec<&DemandSite> = sites.iter().collect();
    ordered.sort_by(|a, b| {
        a.location_id
            .cmp(&b.location_id)
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered
}
