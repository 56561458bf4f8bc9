//! Discrete grid coordinates and the cached samples attached to them.

use nalgebra::Point3;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer position of a grid cell's south-west corner, in world units.
///
/// Coordinates are always multiples of the grid resolution. Equality and hashing
/// are structural, so coordinates double as map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridCoordinate {
    /// X position in world units.
    pub x: i32,
    /// Y position in world units.
    pub y: i32,
}

impl GridCoordinate {
    /// Creates a coordinate from world-unit components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves by `(dx, dy)` cells of `resolution` world units.
    ///
    /// Returns `None` if the result does not fit in an `i32`.
    pub fn offset(self, dx: i32, dy: i32, resolution: i32) -> Option<Self> {
        let x = dx.checked_mul(resolution)?.checked_add(self.x)?;
        let y = dy.checked_mul(resolution)?.checked_add(self.y)?;
        Some(Self { x, y })
    }

    /// Horizontal Euclidean distance in world units.
    pub fn distance_to(&self, other: &GridCoordinate) -> f32 {
        let dx = (i64::from(other.x) - i64::from(self.x)) as f64;
        let dy = (i64::from(other.y) - i64::from(self.y)) as f64;
        dx.hypot(dy) as f32
    }

    /// Lifts the coordinate into 3D at the given height.
    pub fn with_height(&self, height: f32) -> Point3<f32> {
        Point3::new(self.x as f32, self.y as f32, height)
    }
}

impl From<(i32, i32)> for GridCoordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The surface height sampled at a grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampledCell {
    /// Where the sample was taken.
    pub coordinate: GridCoordinate,
    /// Surface height at the coordinate.
    pub height: f32,
}

impl SampledCell {
    /// 3D position of the sample.
    pub fn point(&self) -> Point3<f32> {
        self.coordinate.with_height(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_offset_scales_by_resolution() {
        let origin = GridCoordinate::new(2000, -1000);
        assert_eq!(origin.offset(1, -1, 1000), Some(GridCoordinate::new(3000, -2000)));
        assert_eq!(origin.offset(0, 0, 1000), Some(origin));
    }

    #[test]
    fn test_offset_overflow_is_none() {
        let edge = GridCoordinate::new(i32::MAX - 10, 0);
        assert_eq!(edge.offset(1, 0, 1000), None);
        assert_eq!(GridCoordinate::new(0, 0).offset(i32::MAX, 0, 2), None);
    }

    #[test]
    fn test_distance_to() {
        let a = GridCoordinate::new(0, 0);
        let b = GridCoordinate::new(3000, 4000);
        assert_relative_eq!(a.distance_to(&b), 5000.0);
        assert_relative_eq!(b.distance_to(&a), 5000.0);
    }

    #[test]
    fn test_sampled_cell_point_and_display() {
        let cell = SampledCell {
            coordinate: GridCoordinate::new(1000, 2000),
            height: 12.5,
        };
        assert_eq!(cell.point(), Point3::new(1000.0, 2000.0, 12.5));
        assert_eq!(format!("{}", cell.coordinate), "(1000, 2000)");
    }
}
