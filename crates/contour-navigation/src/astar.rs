//! A* search over a [`TerrainGrid`].
//!
//! f(n) = g(n) + h(n), where g is the accumulated edge cost from the start cell and
//! h the horizontal distance to the goal. Slope is a feasibility gate on each edge,
//! so edges steeper than the configured threshold never enter the frontier.
//!
//! The goal is detected while generating successors: as soon as an accepted edge
//! lands on the destination cell the path is reconstructed and returned.

use crate::config::SearchConfig;
use crate::cost::CostModel;
use crate::error::{NavigationError, PathError};
use crate::map::{GridCoordinate, TerrainGrid};
use crate::path::reconstruct_path;
use nalgebra::Point3;

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a successful path query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathResult {
    /// Points from the exact source to the exact destination.
    pub waypoints: Vec<Point3<f32>>,
    /// Grid cells visited, start cell first and goal cell last.
    pub cells: Vec<GridCoordinate>,
    /// Accumulated cost of the path.
    pub total_cost: f32,
    /// Number of nodes expanded during the search.
    pub nodes_explored: usize,
}

impl PathResult {
    /// Number of waypoints.
    pub fn path_length(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns the waypoints.
    pub fn into_waypoints(self) -> Vec<Point3<f32>> {
        self.waypoints
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PathResult {{ path_length: {}, cells: {}, total_cost: {:.3}, nodes_explored: {} }}",
            self.path_length(),
            self.cells.len(),
            self.total_cost,
            self.nodes_explored
        )
    }
}

/// A cell annotated with its search costs.
///
/// Two nodes are the same node when they share a coordinate; the costs are not part
/// of the identity.
#[derive(Debug, Clone, Copy)]
pub struct SearchNode {
    /// Cell this node stands for.
    pub coordinate: GridCoordinate,
    /// Cell this node was reached from. The start node is its own parent.
    pub parent: GridCoordinate,
    /// Accumulated cost from the start.
    pub g_cost: f32,
    /// Estimated cost to the goal.
    pub h_cost: f32,
    /// `g_cost + h_cost`.
    pub f_cost: f32,
}

impl SearchNode {
    /// The zero-cost node the search starts from.
    pub fn start(coordinate: GridCoordinate) -> Self {
        Self {
            coordinate,
            parent: coordinate,
            g_cost: 0.0,
            h_cost: 0.0,
            f_cost: 0.0,
        }
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.coordinate == other.coordinate
    }
}

impl Eq for SearchNode {}

impl fmt::Display for SearchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SearchNode {{ coordinate: {}, parent: {}, g: {:.3}, h: {:.3}, f: {:.3} }}",
            self.coordinate, self.parent, self.g_cost, self.h_cost, self.f_cost
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f_cost: f32,
    sequence: u64,
    coordinate: GridCoordinate,
}

// `BinaryHeap` is a max-heap: flip both comparisons so the lowest f pops first and
// equal f values pop in insertion order.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Open set keyed by coordinate.
///
/// Re-pushing a coordinate replaces its node; the superseded heap entry stays in
/// the heap and is dropped when it surfaces.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    best: HashMap<GridCoordinate, (u64, SearchNode)>,
    next_sequence: u64,
}

impl Frontier {
    /// Creates an empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node`, replacing any node already queued at its coordinate.
    pub fn push(&mut self, node: SearchNode) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.best.insert(node.coordinate, (sequence, node));
        self.heap.push(FrontierEntry {
            f_cost: node.f_cost,
            sequence,
            coordinate: node.coordinate,
        });
    }

    /// Removes and returns the node with the lowest f cost.
    pub fn pop_min(&mut self) -> Option<SearchNode> {
        while let Some(entry) = self.heap.pop() {
            let current = matches!(
                self.best.get(&entry.coordinate),
                Some((sequence, _)) if *sequence == entry.sequence
            );
            if current {
                return self.best.remove(&entry.coordinate).map(|(_, node)| node);
            }
        }
        None
    }

    /// Node queued at `coordinate`, if any.
    pub fn get(&self, coordinate: &GridCoordinate) -> Option<&SearchNode> {
        self.best.get(coordinate).map(|(_, node)| node)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.best.len()
    }

    /// Whether no live node remains.
    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.best.clear();
        self.next_sequence = 0;
    }
}

/// Expanded nodes keyed by coordinate.
pub type ClosedSet = HashMap<GridCoordinate, SearchNode>;

/// Single-query A* search state over a borrowed grid.
///
/// The pathfinder can be reused; every call to [`compute_path`](Self::compute_path)
/// starts from empty frontier, closed set and parent map.
pub struct Pathfinder<'a> {
    grid: &'a TerrainGrid,
    config: &'a SearchConfig,
    cost_model: CostModel,
    frontier: Frontier,
    closed: ClosedSet,
    parents: HashMap<GridCoordinate, GridCoordinate>,
}

impl<'a> Pathfinder<'a> {
    /// Creates a pathfinder after validating `config`.
    pub fn new(grid: &'a TerrainGrid, config: &'a SearchConfig) -> Result<Self, NavigationError> {
        config.validate()?;
        Ok(Self::from_validated(grid, config))
    }

    pub(crate) fn from_validated(grid: &'a TerrainGrid, config: &'a SearchConfig) -> Self {
        Self {
            grid,
            config,
            cost_model: CostModel::new(grid.resolution(), config),
            frontier: Frontier::new(),
            closed: ClosedSet::new(),
            parents: HashMap::new(),
        }
    }

    /// Parent links recorded by the last query. The start cell is its own parent.
    pub fn parents(&self) -> &HashMap<GridCoordinate, GridCoordinate> {
        &self.parents
    }

    /// Finds a path between two continuous positions.
    ///
    /// # Arguments
    /// * `source` - Exact start position
    /// * `destination` - Exact end position
    ///
    /// # Returns
    /// * `Result<PathResult, PathError>` - Waypoints from source to destination, or
    ///   why no path was produced
    pub fn compute_path(
        &mut self,
        source: &Point3<f32>,
        destination: &Point3<f32>,
    ) -> Result<PathResult, PathError> {
        self.reset();

        for point in [source, destination] {
            if !point.iter().all(|c| c.is_finite()) {
                return Err(PathError::InvalidQueryPoint {
                    x: point.x,
                    y: point.y,
                    z: point.z,
                });
            }
        }

        let start = self.grid.quantize(source);
        let goal = self.grid.quantize(destination);

        for (label, coordinate) in [("source", start), ("destination", goal)] {
            if !self.grid.contains(&coordinate) {
                warn!("Query {} cell {} is not on the terrain grid", label, coordinate);
                return Err(PathError::NoPathFound { nodes_explored: 0 });
            }
        }

        self.parents.insert(start, start);

        if start == goal {
            debug!("Source and destination share cell {}", start);
            return Ok(PathResult {
                waypoints: vec![*source, *destination],
                cells: vec![start],
                total_cost: 0.0,
                nodes_explored: 0,
            });
        }

        let grid = self.grid;
        let config = self.config;
        let resolution = grid.resolution();
        self.frontier.push(SearchNode::start(start));
        let mut nodes_explored = 0;

        while !self.frontier.is_empty() {
            if let Some(limit) = config.max_expansions {
                if nodes_explored >= limit {
                    debug!("Search budget of {} expansions exhausted", limit);
                    self.frontier.clear();
                    return Err(PathError::SearchBudgetExhausted { limit });
                }
            }

            let Some(current) = self.frontier.pop_min() else {
                break;
            };
            nodes_explored += 1;
            trace!("Expanding {}", current);

            let Some(current_cell) = grid.lookup(&current.coordinate) else {
                continue;
            };

            for &(dx, dy) in config.neighbor_mask.offsets() {
                let Some(candidate) = current.coordinate.offset(dx, dy, resolution) else {
                    continue;
                };
                let Some(candidate_cell) = grid.lookup(&candidate) else {
                    trace!("Neighbor {} is not on the terrain grid", candidate);
                    continue;
                };
                let Some(edge) =
                    self.cost_model
                        .evaluate(current_cell, current.g_cost, candidate_cell, &goal)
                else {
                    continue;
                };

                if candidate == goal {
                    self.parents.insert(goal, current.coordinate);
                    self.frontier.clear();
                    let reconstruction =
                        reconstruct_path(grid, &self.parents, goal, source, destination)?;
                    debug!(
                        nodes_explored,
                        total_cost = edge.g_cost,
                        "Path found with {} cells",
                        reconstruction.cells.len()
                    );
                    return Ok(PathResult {
                        waypoints: reconstruction.waypoints,
                        cells: reconstruction.cells,
                        total_cost: edge.g_cost,
                        nodes_explored,
                    });
                }

                let dominated = |node: Option<&SearchNode>| {
                    node.is_some_and(|existing| existing.f_cost <= edge.f_cost)
                };
                if dominated(self.frontier.get(&candidate))
                    || dominated(self.closed.get(&candidate))
                {
                    continue;
                }

                self.closed.remove(&candidate);
                self.parents.insert(candidate, current.coordinate);
                self.frontier.push(SearchNode {
                    coordinate: candidate,
                    parent: current.coordinate,
                    g_cost: edge.g_cost,
                    h_cost: edge.h_cost,
                    f_cost: edge.f_cost,
                });
            }

            self.closed.insert(current.coordinate, current);
        }

        debug!("No path found after exploring {} nodes", nodes_explored);
        Err(PathError::NoPathFound { nodes_explored })
    }

    fn reset(&mut self) {
        self.frontier.clear();
        self.closed.clear();
        self.parents.clear();
    }
}
