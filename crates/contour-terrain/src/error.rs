//! This module defines the error types used by the `contour-terrain` crate.

/// Error type for surface construction and sampling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// A raster spacing was zero, negative or not finite.
    #[error("Invalid raster spacing: {0} (must be positive)")]
    InvalidSpacing(f32),
    /// Raster dimensions or height data are inconsistent.
    #[error("Invalid raster: {0}")]
    InvalidRaster(&'static str),
    /// Raster node indices outside the raster.
    #[error("Raster node ({column}, {row}) out of bounds")]
    OutOfBounds {
        /// Column index that was requested.
        column: usize,
        /// Row index that was requested.
        row: usize,
    },
    /// A vertical search window that is empty or not finite.
    #[error("Invalid sample range: floor {floor}, ceiling {ceiling}")]
    InvalidSampleRange {
        /// Lower bound that was requested.
        floor: f32,
        /// Upper bound that was requested.
        ceiling: f32,
    },
}
