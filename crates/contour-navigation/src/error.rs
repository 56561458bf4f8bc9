//! This module defines the error types used by the `contour-navigation` crate.

#![warn(missing_docs)]

use crate::map::GridCoordinate;
use contour_terrain::TerrainError;

/// Error type for grid construction and configuration.
///
/// This enum covers everything that can go wrong before a search starts, such as
/// invalid tunables or unusable surface bounds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavigationError {
    /// Error for an invalid grid resolution.
    /// This variant is returned when the cell size is zero or negative.
    #[error("Invalid grid resolution: {0} (must be positive)")]
    InvalidResolution(i32),
    /// Error for an unusable neighbor mask.
    /// This variant is returned when the mask is empty or contains `(0, 0)`.
    #[error("Invalid neighbor mask: {0}")]
    InvalidNeighborMask(&'static str),
    /// Error for a cost weight outside its allowed range.
    #[error("Invalid cost weight {name}: {value}")]
    InvalidCostWeight {
        /// Name of the offending weight.
        name: &'static str,
        /// Value that was supplied.
        value: f32,
    },
    /// Error for a slope threshold outside `[0, 90]` degrees.
    #[error("Invalid max angle threshold: {0} degrees (expected 0 to 90)")]
    InvalidAngleThreshold(f32),
    /// Error for a zero expansion budget.
    #[error("Invalid expansion budget: {0}")]
    InvalidExpansionBudget(&'static str),
    /// Error for surface bounds that cannot be gridded.
    #[error("Invalid surface bounds: {0}")]
    InvalidBounds(&'static str),
    /// Error for a grid whose cell count exceeds the supported maximum.
    #[error("Terrain grid too large: {cells} cells")]
    GridTooLarge {
        /// Number of cells the bounds would produce.
        cells: u64,
    },
    /// Error for a build attempted without a surface to sample.
    #[error("No terrain surface available to sample")]
    MissingSurface,
    /// Error raised by the terrain layer.
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}

/// Error type for path queries.
///
/// All variants are recoverable: the grid is untouched and the next query starts
/// from a clean search state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    /// The frontier drained without reaching the destination, or an endpoint lies
    /// on no sampled cell.
    #[error("No path found after exploring {nodes_explored} nodes")]
    NoPathFound {
        /// Number of nodes expanded before giving up.
        nodes_explored: usize,
    },
    /// The search expanded its configured maximum number of nodes.
    #[error("Search budget of {limit} expansions exhausted")]
    SearchBudgetExhausted {
        /// The configured expansion limit.
        limit: usize,
    },
    /// A query point contained NaN or infinite components.
    #[error("Query point is not finite: ({x}, {y}, {z})")]
    InvalidQueryPoint {
        /// X component.
        x: f32,
        /// Y component.
        y: f32,
        /// Z component.
        z: f32,
    },
    /// The parent map did not lead from the goal back to the start.
    #[error("Parent chain broken at {at}")]
    BrokenParentChain {
        /// Coordinate whose parent could not be followed.
        at: GridCoordinate,
    },
}
