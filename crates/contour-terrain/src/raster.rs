//! Raster heightmap surface.
//!
//! Heights are stored on a regular lattice of nodes, row-major with rows along
//! `y`. Positions between nodes are bilinearly interpolated. A `NaN` node is a
//! hole: any sample that depends on it finds no surface.

use crate::{HeightProbe, SampleRange, SurfaceBounds, TerrainError};
use nalgebra::{Point2, Vector2};

/// A regular raster of height samples.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterSurface {
    /// World position of node (0, 0).
    origin: Point2<f32>,
    /// Distance between neighbouring nodes along both axes.
    spacing: f32,
    columns: usize,
    rows: usize,
    /// Row-major node heights, `rows * columns` entries.
    heights: Vec<f32>,
}

impl RasterSurface {
    /// Creates a raster from explicit node heights.
    ///
    /// # Arguments
    /// * `origin` - World position of node (0, 0)
    /// * `spacing` - Distance between nodes in world units
    /// * `columns` - Number of nodes along x
    /// * `rows` - Number of nodes along y
    /// * `heights` - Row-major heights; `NaN` marks a hole
    ///
    /// # Returns
    /// * `Result<Self, TerrainError>` - The raster or an error if the inputs are inconsistent
    pub fn new(
        origin: Point2<f32>,
        spacing: f32,
        columns: usize,
        rows: usize,
        heights: Vec<f32>,
    ) -> Result<Self, TerrainError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(TerrainError::InvalidSpacing(spacing));
        }
        if columns == 0 || rows == 0 {
            return Err(TerrainError::InvalidRaster(
                "Raster must have at least one row and one column",
            ));
        }
        let expected = columns
            .checked_mul(rows)
            .ok_or(TerrainError::InvalidRaster("Raster dimensions overflow"))?;
        if heights.len() != expected {
            return Err(TerrainError::InvalidRaster(
                "Height count does not match raster dimensions",
            ));
        }
        if heights.iter().any(|h| h.is_infinite()) {
            return Err(TerrainError::InvalidRaster("Heights must be finite or NaN"));
        }
        if !origin.iter().all(|c| c.is_finite()) {
            return Err(TerrainError::InvalidRaster("Origin must be finite"));
        }

        Ok(Self {
            origin,
            spacing,
            columns,
            rows,
            heights,
        })
    }

    /// Creates a raster by evaluating `height` at every node's world position.
    pub fn from_fn<F>(
        origin: Point2<f32>,
        spacing: f32,
        columns: usize,
        rows: usize,
        height: F,
    ) -> Result<Self, TerrainError>
    where
        F: Fn(f32, f32) -> f32,
    {
        let heights = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| (column, row)))
            .map(|(column, row)| {
                height(
                    origin.x + column as f32 * spacing,
                    origin.y + row as f32 * spacing,
                )
            })
            .collect();
        Self::new(origin, spacing, columns, rows, heights)
    }

    /// Number of nodes along x.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of nodes along y.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Distance between nodes.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Height stored at a node, `None` for holes and indices outside the raster.
    pub fn height_at(&self, column: usize, row: usize) -> Option<f32> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let height = self.heights[row * self.columns + column];
        (!height.is_nan()).then_some(height)
    }

    /// Overwrites a node height. Pass `f32::NAN` to punch a hole.
    pub fn set_height(
        &mut self,
        column: usize,
        row: usize,
        height: f32,
    ) -> Result<(), TerrainError> {
        if column >= self.columns || row >= self.rows {
            return Err(TerrainError::OutOfBounds { column, row });
        }
        if height.is_infinite() {
            return Err(TerrainError::InvalidRaster("Heights must be finite or NaN"));
        }
        self.heights[row * self.columns + column] = height;
        Ok(())
    }

    /// Bilinear sample at a world position.
    ///
    /// Positions exactly on a node or node row only read the nodes they touch, so a
    /// hole never leaks into its neighbours' node samples.
    pub fn sample(&self, x: f32, y: f32) -> Option<f32> {
        let fx = (x - self.origin.x) / self.spacing;
        let fy = (y - self.origin.y) / self.spacing;
        if !fx.is_finite() || !fy.is_finite() {
            return None;
        }

        let max_x = (self.columns - 1) as f32;
        let max_y = (self.rows - 1) as f32;
        if fx < 0.0 || fy < 0.0 || fx > max_x || fy > max_y {
            return None;
        }

        let column = fx.floor() as usize;
        let row = fy.floor() as usize;
        let tx = fx - column as f32;
        let ty = fy - row as f32;

        let along_x = |row: usize| -> Option<f32> {
            let left = self.height_at(column, row)?;
            if tx == 0.0 {
                return Some(left);
            }
            let right = self.height_at(column + 1, row)?;
            Some(left + (right - left) * tx)
        };

        let near = along_x(row)?;
        if ty == 0.0 {
            return Some(near);
        }
        let far = along_x(row + 1)?;
        Some(near + (far - near) * ty)
    }
}

impl HeightProbe for RasterSurface {
    fn probe(&self, x: f32, y: f32, range: SampleRange) -> Option<f32> {
        self.sample(x, y).filter(|height| range.contains(*height))
    }

    fn bounds(&self) -> Option<SurfaceBounds> {
        Some(SurfaceBounds::new(
            self.origin,
            Vector2::new(
                (self.columns - 1) as f32 * self.spacing,
                (self.rows - 1) as f32 * self.spacing,
            ),
        ))
    }
}
