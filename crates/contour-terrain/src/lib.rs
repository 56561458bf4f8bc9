//! Height probes over continuous terrain surfaces.
//!
//! A [`HeightProbe`] answers a single question: given a horizontal position and a
//! vertical search window, where is the surface? Grid builders call it once per
//! cell, so implementations must be cheap to share across threads.
//!
//! # Coordinate Convention
//!
//! - `x` and `y` are horizontal world coordinates.
//! - `z` (height) grows upwards. The search window is `[floor, ceiling]`.

#![warn(missing_docs)]

pub mod error;
pub mod flat;
pub mod raster;

pub use error::TerrainError;
pub use flat::FlatSurface;
pub use raster::RasterSurface;

use nalgebra::{Point2, Vector2};

/// A source of surface heights.
///
/// Implementors are typically raycasts against a scene, raster heightmaps or
/// analytic surfaces. A probe that cannot find the surface inside the requested
/// window returns `None`; callers treat that as "no terrain here".
pub trait HeightProbe: Sync {
    /// Returns the surface height at `(x, y)` if it lies within `range`.
    fn probe(&self, x: f32, y: f32, range: SampleRange) -> Option<f32>;

    /// Horizontal bounds of the surface, or `None` when no surface is available.
    fn bounds(&self) -> Option<SurfaceBounds>;
}

impl<T: HeightProbe + ?Sized> HeightProbe for &T {
    fn probe(&self, x: f32, y: f32, range: SampleRange) -> Option<f32> {
        (**self).probe(x, y, range)
    }

    fn bounds(&self) -> Option<SurfaceBounds> {
        (**self).bounds()
    }
}

impl<T: HeightProbe + ?Sized> HeightProbe for Box<T> {
    fn probe(&self, x: f32, y: f32, range: SampleRange) -> Option<f32> {
        (**self).probe(x, y, range)
    }

    fn bounds(&self) -> Option<SurfaceBounds> {
        (**self).bounds()
    }
}

/// Vertical window searched by a probe.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleRange {
    floor: f32,
    ceiling: f32,
}

impl SampleRange {
    /// Creates a window spanning `[floor, ceiling]`.
    ///
    /// # Returns
    /// * `Result<Self, TerrainError>` - The window, or an error if either bound is
    ///   not finite or `floor > ceiling`.
    pub fn new(floor: f32, ceiling: f32) -> Result<Self, TerrainError> {
        if !floor.is_finite() || !ceiling.is_finite() || floor > ceiling {
            return Err(TerrainError::InvalidSampleRange { floor, ceiling });
        }
        Ok(Self { floor, ceiling })
    }

    /// Creates a window reaching `max_height` above zero and `max_depth` below it.
    pub fn from_limits(max_height: f32, max_depth: f32) -> Result<Self, TerrainError> {
        Self::new(-max_depth, max_height)
    }

    /// Lowest height searched.
    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Highest height searched.
    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// Whether `height` falls inside the window.
    pub fn contains(&self, height: f32) -> bool {
        height >= self.floor && height <= self.ceiling
    }
}

/// Horizontal footprint of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceBounds {
    /// South-west corner in world units.
    pub origin: Point2<f32>,
    /// Size along x and y in world units.
    pub extent: Vector2<f32>,
}

impl SurfaceBounds {
    /// Creates bounds from a corner and a size.
    pub fn new(origin: Point2<f32>, extent: Vector2<f32>) -> Self {
        Self { origin, extent }
    }

    /// North-east corner.
    pub fn max(&self) -> Point2<f32> {
        self.origin + self.extent
    }

    /// Bounds are usable when every component is finite and the extent is non-negative.
    pub fn is_valid(&self) -> bool {
        self.origin.iter().all(|c| c.is_finite())
            && self.extent.iter().all(|c| c.is_finite() && *c >= 0.0)
    }

    /// Whether `(x, y)` lies inside the bounds, edges included.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let max = self.max();
        x >= self.origin.x && x <= max.x && y >= self.origin.y && y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_range_from_limits() {
        let range = SampleRange::from_limits(10000.0, 5000.0).unwrap();
        assert_eq!(range.floor(), -5000.0);
        assert_eq!(range.ceiling(), 10000.0);
        assert!(range.contains(0.0));
        assert!(range.contains(-5000.0));
        assert!(!range.contains(10000.5));
    }

    #[test]
    fn test_sample_range_rejects_inverted_window() {
        assert!(matches!(
            SampleRange::new(10.0, -10.0),
            Err(TerrainError::InvalidSampleRange { .. })
        ));
        assert!(SampleRange::new(f32::NAN, 1.0).is_err());
    }

    #[test]
    fn test_surface_bounds() {
        let bounds = SurfaceBounds::new(Point2::new(-10.0, 0.0), Vector2::new(20.0, 5.0));
        assert!(bounds.is_valid());
        assert_eq!(bounds.max(), Point2::new(10.0, 5.0));
        assert!(bounds.contains(10.0, 5.0));
        assert!(!bounds.contains(10.1, 5.0));

        let negative = SurfaceBounds::new(Point2::new(0.0, 0.0), Vector2::new(-1.0, 5.0));
        assert!(!negative.is_valid());
    }
}
