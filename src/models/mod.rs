//! Domain model types for collection route planning.
//!
//! Provides the core abstractions: locations on the plane, demand sites
//! waiting for collection, capacity-limited vehicles, and solutions that map
//! each vehicle to an ordered route.

mod location;
mod route;
mod site;
mod solution;
mod vehicle;

pub use location::Location;
pub use route::{depot_framing, frame_route, strip_depot_framing, strip_route, RouteForm};
pub(crate) use site::sorted_by_location;
pub use site::DemandSite;
pub use solution::Solution;
pub use vehicle::Vehicle;
