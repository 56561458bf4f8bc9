//! Map-related functionality for navigation.
//!
//! This module provides the quantized terrain cache and the coordinate types
//! the search uses to address it.

pub mod point_types;
pub mod terrain_grid;

pub use point_types::{GridCoordinate, SampledCell};
pub use terrain_grid::{BuildReport, MAX_GRID_CELLS, TerrainGrid, quantize};
