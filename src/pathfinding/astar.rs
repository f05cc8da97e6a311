//! A* shortest path over a [`SpatialGraph`].
//!
//! # Algorithm
//!
//! Best-first search keyed by `f = g + h`, where `g` is the accumulated edge
//! weight from the start and `h` is the straight-line distance to the goal.
//! The straight line never exceeds a path through the graph when edge
//! weights are Euclidean, so `h` is admissible and consistent.
//!
//! Equal `f` values pop in insertion order, which makes the returned path
//! identical across runs for identical input.
//!
//! # Reference
//!
//! Hart, P.E., Nilsson, N.J. & Raphael, B. (1968). "A Formal Basis for the
//! Heuristic Determination of Minimum Cost Paths", *IEEE Transactions on
//! Systems Science and Cybernetics* 4(2), 100-107.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::graph::SpatialGraph;

#[derive(Debug, Clone, Copy)]
struct HeapItem {
    node: usize,
    /// g_score + straight-line estimate to the goal
    f_score: f64,
    /// push counter, breaks ties first-in first-out
    seq: u64,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip both keys to make this a min-heap
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Finds a shortest path between two locations.
///
/// Returns the location ids from `start` to `goal` inclusive, `[start]` when
/// both are the same, and `None` when either id is unknown or the goal is
/// unreachable. `None` is an expected outcome, not a failure.
///
/// # Examples
///
/// ```
/// use u_routeplan::graph::{GridSpec, SpatialGraph};
/// use u_routeplan::pathfinding::find_path;
///
/// let g = SpatialGraph::from_grid(&GridSpec::new(3, 1)).unwrap();
/// let path = find_path(&g, "N0_0", "N0_2").unwrap();
/// assert_eq!(path, vec!["N0_0", "N0_1", "N0_2"]);
/// assert_eq!(find_path(&g, "N0_1", "N0_1").unwrap(), vec!["N0_1"]);
/// ```
pub fn find_path(graph: &SpatialGraph, start: &str, goal: &str) -> Option<Vec<String>> {
    let s = graph.index_of(start)?;
    let t = graph.index_of(goal)?;
    let path = find_path_indices(graph, s, t)?;
    Some(path.into_iter().map(|i| graph.id_at(i).to_string()).collect())
}

/// Index-based A*.
fn find_path_indices(graph: &SpatialGraph, start: usize, goal: usize) -> Option<Vec<usize>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut heap = BinaryHeap::new();
    let mut g_score: HashMap<usize, f64> = HashMap::new();
    let mut came_from: HashMap<usize, usize> = HashMap::new();
    let mut closed: HashSet<usize> = HashSet::new();
    let mut seq = 0u64;

    g_score.insert(start, 0.0);
    heap.push(HeapItem {
        node: start,
        f_score: graph.distance_between(start, goal),
        seq,
    });
    seq += 1;

    while let Some(HeapItem { node, .. }) = heap.pop() {
        if !closed.insert(node) {
            // stale entry
            continue;
        }
        if node == goal {
            return Some(reconstruct_path(&came_from, node));
        }

        let g = g_score[&node];
        for &(next, weight) in graph.neighbors_at(node) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = g + weight;
            if g_score.get(&next).is_none_or(|&known| tentative < known) {
                came_from.insert(next, node);
                g_score.insert(next, tentative);
                heap.push(HeapItem {
                    node: next,
                    f_score: tentative + graph.distance_between(next, goal),
                    seq,
                });
                seq += 1;
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<usize, usize>, mut current: usize) -> Vec<usize> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        current = prev;
        path.push(current);
    }
    path.reverse();
    path
}

/// Sum of straight-line distances between consecutive locations.
///
/// Returns `0.0` for fewer than two locations and `f64::INFINITY` if an id
/// is unknown.
pub fn path_distance(graph: &SpatialGraph, path: &[String]) -> f64 {
    if path.len() < 2 {
        return 0.0;
    }
    path.windows(2).map(|w| graph.distance(&w[0], &w[1])).sum()
}

/// Sum of edge weights along a path.
///
/// Returns `None` if two consecutive locations are not adjacent.
pub fn path_cost(graph: &SpatialGraph, path: &[String]) -> Option<f64> {
    path.windows(2)
        .map(|w| graph.neighbors(&w[0]).get(w[1].as_str()).copied())
        .sum()
}
