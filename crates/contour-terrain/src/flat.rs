//! A level plane.

use crate::{HeightProbe, SampleRange, SurfaceBounds};

/// Constant-height surface over a rectangular footprint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatSurface {
    bounds: SurfaceBounds,
    height: f32,
}

impl FlatSurface {
    /// Creates a plane at `height` covering `bounds`.
    pub fn new(bounds: SurfaceBounds, height: f32) -> Self {
        Self { bounds, height }
    }

    /// Height of the plane.
    pub fn height(&self) -> f32 {
        self.height
    }
}

impl HeightProbe for FlatSurface {
    fn probe(&self, x: f32, y: f32, range: SampleRange) -> Option<f32> {
        (self.bounds.contains(x, y) && range.contains(self.height)).then_some(self.height)
    }

    fn bounds(&self) -> Option<SurfaceBounds> {
        Some(self.bounds)
    }
}
