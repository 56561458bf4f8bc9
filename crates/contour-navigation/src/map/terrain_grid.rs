//! Quantized heightmap cache.
//!
//! A [`TerrainGrid`] samples a surface once at every multiple of its resolution
//! and keeps the hits in a hash map keyed by [`GridCoordinate`]. Coordinates whose
//! probe missed are simply absent, so `contains` doubles as the bounds check:
//! holes in the surface and positions off the edge look the same to the search.

#![warn(missing_docs)]

// NOTES:
// - Cells are never re-sampled or invalidated; rebuild the whole grid instead.

use crate::config::GridConfig;
use crate::error::NavigationError;
use crate::map::point_types::{GridCoordinate, SampledCell};
use contour_terrain::{HeightProbe, SampleRange, SurfaceBounds};
use nalgebra::{Point2, Point3, Vector2};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use tracing::{error, info, warn};

/// Upper bound on the number of cells a single build may visit.
pub const MAX_GRID_CELLS: u64 = 1 << 26;

/// Floors one axis to the containing cell's lower edge.
///
/// Positions beyond the `i32` range land on the outermost aligned cell, so the
/// result is always a multiple of `resolution`.
fn quantize_axis(value: f32, resolution: i32) -> i32 {
    let resolution = resolution.max(1);
    let cells = (f64::from(value) / f64::from(resolution)).floor();
    let lowest = f64::from(i32::MIN / resolution);
    let highest = f64::from(i32::MAX / resolution);
    // NaN survives the clamp and `as` maps it to zero
    (cells.clamp(lowest, highest) as i32) * resolution
}

/// Maps a continuous position to the south-west corner of its grid cell.
///
/// Only the horizontal components are used. Quantizing an already quantized
/// position returns it unchanged. A non-positive resolution is treated as 1.
pub fn quantize(position: &Point3<f32>, resolution: i32) -> GridCoordinate {
    GridCoordinate::new(
        quantize_axis(position.x, resolution),
        quantize_axis(position.y, resolution),
    )
}

/// Outcome counts of a grid build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildReport {
    /// Coordinates whose probe found the surface.
    pub sampled: usize,
    /// Coordinates whose probe found nothing.
    pub missed: usize,
}

impl BuildReport {
    /// Total number of coordinates probed.
    pub fn visited(&self) -> usize {
        self.sampled + self.missed
    }
}

/// Read-only cache of surface heights on a uniform grid.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    /// Cell edge length in world units.
    resolution: i32,
    /// South-west corner of the sampled surface.
    origin: Point2<f32>,
    /// Horizontal size of the sampled surface.
    extent: Vector2<f32>,
    /// Successful samples keyed by coordinate.
    cells: HashMap<GridCoordinate, SampledCell>,
}

impl TerrainGrid {
    /// Creates a grid with no cells. Every query against it fails.
    pub fn empty(resolution: i32) -> Result<Self, NavigationError> {
        if resolution <= 0 {
            return Err(NavigationError::InvalidResolution(resolution));
        }
        Ok(Self {
            resolution,
            origin: Point2::origin(),
            extent: Vector2::zeros(),
            cells: HashMap::new(),
        })
    }

    /// Samples `probe` at every grid coordinate covering `bounds`.
    ///
    /// Coordinates run from the quantized origin up to the last multiple of the
    /// resolution that does not pass `origin + extent`, both ends inclusive. Each
    /// miss is logged and left out of the cache.
    ///
    /// # Arguments
    /// * `bounds` - Horizontal area to cover
    /// * `config` - Resolution, probe window and parallelism
    /// * `probe` - Surface to sample
    ///
    /// # Returns
    /// * `Result<(Self, BuildReport), NavigationError>` - The grid and its hit/miss counts
    pub fn build<P>(
        bounds: &SurfaceBounds,
        config: &GridConfig,
        probe: &P,
    ) -> Result<(Self, BuildReport), NavigationError>
    where
        P: HeightProbe + ?Sized,
    {
        config.validate()?;
        if !bounds.is_valid() {
            return Err(NavigationError::InvalidBounds(
                "Bounds must be finite with a non-negative extent",
            ));
        }

        let resolution = config.resolution;
        let range = config.sample_range()?;
        let max = bounds.max();

        let first_x = quantize_axis(bounds.origin.x, resolution) / resolution;
        let first_y = quantize_axis(bounds.origin.y, resolution) / resolution;
        let last_x = quantize_axis(max.x, resolution) / resolution;
        let last_y = quantize_axis(max.y, resolution) / resolution;

        let columns = u64::try_from(i64::from(last_x) - i64::from(first_x) + 1).unwrap_or(0);
        let rows = u64::try_from(i64::from(last_y) - i64::from(first_y) + 1).unwrap_or(0);
        let total = columns.saturating_mul(rows);
        if total > MAX_GRID_CELLS {
            return Err(NavigationError::GridTooLarge { cells: total });
        }

        info!(
            "Surface dimensions: ({:.1}, {:.1}), grid dimensions: ({}, {}), resolution: {}",
            bounds.extent.x, bounds.extent.y, columns, rows, resolution
        );

        let coordinates: Vec<GridCoordinate> = (first_x..=last_x)
            .flat_map(|ix| {
                (first_y..=last_y)
                    .map(move |iy| GridCoordinate::new(ix * resolution, iy * resolution))
            })
            .collect();

        let samples: Vec<(GridCoordinate, Option<f32>)> = if config.parallel {
            coordinates
                .par_iter()
                .map(|coordinate| sample_cell(probe, *coordinate, range))
                .collect()
        } else {
            coordinates
                .iter()
                .map(|coordinate| sample_cell(probe, *coordinate, range))
                .collect()
        };

        let mut cells = HashMap::with_capacity(samples.len());
        let mut report = BuildReport::default();
        for (coordinate, height) in samples {
            match height {
                Some(height) => {
                    cells.insert(coordinate, SampledCell { coordinate, height });
                    report.sampled += 1;
                }
                None => {
                    warn!(
                        "Height probe missed terrain at {} (window {:.1} to {:.1})",
                        coordinate,
                        range.floor(),
                        range.ceiling()
                    );
                    report.missed += 1;
                }
            }
        }

        info!(
            sampled = report.sampled,
            missed = report.missed,
            "Terrain grid built"
        );

        Ok((
            Self {
                resolution,
                origin: bounds.origin,
                extent: bounds.extent,
                cells,
            },
            report,
        ))
    }

    /// Builds over the probe's own bounds.
    ///
    /// Fails with [`NavigationError::MissingSurface`] when the probe has no surface.
    pub fn from_probe<P>(
        probe: &P,
        config: &GridConfig,
    ) -> Result<(Self, BuildReport), NavigationError>
    where
        P: HeightProbe + ?Sized,
    {
        let Some(bounds) = probe.bounds() else {
            error!("Height probe has no surface, terrain grid not generated");
            return Err(NavigationError::MissingSurface);
        };
        Self::build(&bounds, config, probe)
    }

    /// Cell edge length in world units.
    pub fn resolution(&self) -> i32 {
        self.resolution
    }

    /// South-west corner of the sampled surface.
    pub fn origin(&self) -> &Point2<f32> {
        &self.origin
    }

    /// Horizontal size of the sampled surface.
    pub fn extent(&self) -> &Vector2<f32> {
        &self.extent
    }

    /// Number of cached cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell was sampled.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Quantizes a position using this grid's resolution.
    pub fn quantize(&self, position: &Point3<f32>) -> GridCoordinate {
        quantize(position, self.resolution)
    }

    /// Cached sample at `coordinate`, if the probe hit there.
    pub fn lookup(&self, coordinate: &GridCoordinate) -> Option<&SampledCell> {
        self.cells.get(coordinate)
    }

    /// Whether `coordinate` was sampled. This is the only validity check the search uses.
    pub fn contains(&self, coordinate: &GridCoordinate) -> bool {
        self.cells.contains_key(coordinate)
    }

    /// 3D position of a cached sample.
    pub fn point_of(&self, coordinate: &GridCoordinate) -> Option<Point3<f32>> {
        self.lookup(coordinate).map(SampledCell::point)
    }

    /// Iterates over all cached samples in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = &SampledCell> {
        self.cells.values()
    }
}

fn sample_cell<P>(
    probe: &P,
    coordinate: GridCoordinate,
    range: SampleRange,
) -> (GridCoordinate, Option<f32>)
where
    P: HeightProbe + ?Sized,
{
    let height = probe
        .probe(coordinate.x as f32, coordinate.y as f32, range)
        .filter(|h| h.is_finite());
    (coordinate, height)
}

impl fmt::Display for TerrainGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TerrainGrid ({} cells, resolution: {}, origin: ({:.1}, {:.1}), \
             extent: ({:.1}, {:.1}))",
            self.cells.len(),
            self.resolution,
            self.origin.x,
            self.origin.y,
            self.extent.x,
            self.extent.y
        )
    }
}
