//! Weighted undirected graph over named locations.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{PlanError, Result};
use crate::models::Location;

/// A set of locations plus a symmetric weighted adjacency relation.
///
/// Locations live in an arena and are addressed internally by index; the
/// public API speaks in location ids. Neighbor lists keep edge insertion
/// order, which fixes the expansion order of the pathfinder.
///
/// Distance queries are straight-line Euclidean and ignore connectivity.
///
/// # Examples
///
/// ```
/// use u_routeplan::graph::SpatialGraph;
///
/// let mut g = SpatialGraph::new();
/// g.add_location("A", 0.0, 0.0).unwrap();
/// g.add_location("B", 3.0, 4.0).unwrap();
/// g.add_edge("A", "B", 5.0).unwrap();
///
/// assert_eq!(g.neighbors("A").get("B"), Some(&5.0));
/// assert!((g.distance("A", "B") - 5.0).abs() < 1e-10);
/// assert!(g.distance("A", "Z").is_infinite());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpatialGraph {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
    edges: BTreeSet<(usize, usize)>,
}

impl SpatialGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a location.
    ///
    /// Fails with [`PlanError::DuplicateLocation`] if the id is taken.
    pub fn add_location(&mut self, id: impl Into<String>, x: f64, y: f64) -> Result<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(PlanError::DuplicateLocation(id));
        }
        self.index.insert(id.clone(), self.locations.len());
        self.locations.push(Location::new(id, x, y));
        self.adjacency.push(Vec::new());
        Ok(())
    }

    /// Inserts an undirected edge.
    ///
    /// Both adjacency directions get the same weight. Re-adding an existing
    /// edge overwrites its weight without changing neighbor order.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> Result<()> {
        let ia = self.require(a)?;
        let ib = self.require(b)?;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(PlanError::InvalidWeight {
                from: a.to_string(),
                to: b.to_string(),
                weight,
            });
        }
        self.link(ia, ib, weight);
        self.link(ib, ia, weight);
        self.edges.insert((ia.min(ib), ia.max(ib)));
        Ok(())
    }

    fn link(&mut self, from: usize, to: usize, weight: f64) {
        let list = &mut self.adjacency[from];
        match list.iter_mut().find(|(n, _)| *n == to) {
            Some(entry) => entry.1 = weight,
            None => list.push((to, weight)),
        }
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| PlanError::UnknownLocation(id.to_string()))
    }

    /// Neighbor id → edge weight. Empty for an unknown id.
    pub fn neighbors(&self, id: &str) -> BTreeMap<&str, f64> {
        let Some(i) = self.index_of(id) else {
            return BTreeMap::new();
        };
        self.adjacency[i]
            .iter()
            .map(|&(n, w)| (self.locations[n].id(), w))
            .collect()
    }

    /// Euclidean distance between two locations.
    ///
    /// Returns `f64::INFINITY` if either id is unknown.
    pub fn distance(&self, a: &str, b: &str) -> f64 {
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => self.distance_between(ia, ib),
            _ => f64::INFINITY,
        }
    }

    /// Closest location to `(x, y)`, or `None` for an empty graph.
    ///
    /// Ties keep the earliest registered location.
    pub fn nearest_location(&self, x: f64, y: f64) -> Option<&Location> {
        let mut best: Option<(&Location, f64)> = None;
        for loc in &self.locations {
            let d = loc.distance_to_point(x, y);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((loc, d));
            }
        }
        best.map(|(loc, _)| loc)
    }

    /// Looks up a location by id.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.index_of(id).map(|i| &self.locations[i])
    }

    /// All locations in registration order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Returns `true` if the id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Arena index of a location id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Edges as unordered id pairs (lower index first).
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.edges
            .iter()
            .map(|&(a, b)| (self.locations[a].id(), self.locations[b].id()))
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if no location is registered.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn id_at(&self, index: usize) -> &str {
        self.locations[index].id()
    }

    pub(crate) fn neighbors_at(&self, index: usize) -> &[(usize, f64)] {
        &self.adjacency[index]
    }

    pub(crate) fn distance_between(&self, a: usize, b: usize) -> f64 {
        self.locations[a].distance_to(&self.locations[b])
    }

    /// Resolves a sequence of ids to arena indices.
    pub(crate) fn resolve(&self, ids: &[String]) -> Result<Vec<usize>> {
        ids.iter().map(|id| self.require(id)).collect()
    }
}
