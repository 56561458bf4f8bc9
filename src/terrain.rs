//! Surfaces the binary can build from configuration.

use contour_terrain::{FlatSurface, HeightProbe, RasterSurface, SurfaceBounds, TerrainError};
use nalgebra::{Point2, Vector2};
use serde::Deserialize;
use tracing::info;

/// Surface description, selected by its `kind` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerrainSettings {
    /// Constant-height rectangle.
    Flat {
        origin: [f32; 2],
        extent: [f32; 2],
        #[serde(default)]
        height: f32,
    },
    /// Explicit row-major heights. Listed `holes` are left unsampled.
    Raster {
        origin: [f32; 2],
        spacing: f32,
        columns: usize,
        rows: usize,
        heights: Vec<f32>,
        #[serde(default)]
        holes: Vec<[usize; 2]>,
    },
    /// Rolling sine hills over a raster.
    Hills {
        origin: [f32; 2],
        spacing: f32,
        columns: usize,
        rows: usize,
        amplitude: f32,
        wavelength: f32,
        #[serde(default)]
        holes: Vec<[usize; 2]>,
    },
}

impl TerrainSettings {
    /// Builds the configured surface.
    pub fn build_surface(&self) -> Result<Box<dyn HeightProbe + Send>, TerrainError> {
        let surface: Box<dyn HeightProbe + Send> = match self {
            TerrainSettings::Flat {
                origin,
                extent,
                height,
            } => Box::new(FlatSurface::new(
                SurfaceBounds::new(Point2::from(*origin), Vector2::from(*extent)),
                *height,
            )),
            TerrainSettings::Raster {
                origin,
                spacing,
                columns,
                rows,
                heights,
                holes,
            } => {
                let mut raster = RasterSurface::new(
                    Point2::from(*origin),
                    *spacing,
                    *columns,
                    *rows,
                    heights.clone(),
                )?;
                punch_holes(&mut raster, holes)?;
                Box::new(raster)
            }
            TerrainSettings::Hills {
                origin,
                spacing,
                columns,
                rows,
                amplitude,
                wavelength,
                holes,
            } => {
                let (amplitude, wavelength) = (*amplitude, (*wavelength).max(f32::EPSILON));
                let mut raster = RasterSurface::from_fn(
                    Point2::from(*origin),
                    *spacing,
                    *columns,
                    *rows,
                    |x, y| amplitude * (x / wavelength).sin() * (y / wavelength).cos(),
                )?;
                punch_holes(&mut raster, holes)?;
                Box::new(raster)
            }
        };

        if let Some(bounds) = surface.bounds() {
            info!(
                "Built {} surface: origin ({:.1}, {:.1}), extent ({:.1}, {:.1})",
                self.kind(),
                bounds.origin.x,
                bounds.origin.y,
                bounds.extent.x,
                bounds.extent.y
            );
        }
        Ok(surface)
    }

    fn kind(&self) -> &'static str {
        match self {
            TerrainSettings::Flat { .. } => "flat",
            TerrainSettings::Raster { .. } => "raster",
            TerrainSettings::Hills { .. } => "hills",
        }
    }
}

fn punch_holes(raster: &mut RasterSurface, holes: &[[usize; 2]]) -> Result<(), TerrainError> {
    for &[column, row] in holes {
        raster.set_height(column, row, f32::NAN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_terrain::SampleRange;

    fn window() -> SampleRange {
        SampleRange::from_limits(10000.0, 5000.0).unwrap()
    }

    #[test]
    fn test_flat_surface_from_settings() {
        let settings = TerrainSettings::Flat {
            origin: [0.0, 0.0],
            extent: [1000.0, 2000.0],
            height: 12.0,
        };
        let surface = settings.build_surface().unwrap();
        assert_eq!(surface.probe(500.0, 500.0, window()), Some(12.0));
        assert_eq!(surface.probe(1500.0, 500.0, window()), None);
    }

    #[test]
    fn test_raster_holes() {
        let settings = TerrainSettings::Raster {
            origin: [0.0, 0.0],
            spacing: 100.0,
            columns: 2,
            rows: 2,
            heights: vec![1.0, 2.0, 3.0, 4.0],
            holes: vec![[1, 1]],
        };
        let surface = settings.build_surface().unwrap();
        assert_eq!(surface.probe(0.0, 0.0, window()), Some(1.0));
        assert_eq!(surface.probe(100.0, 100.0, window()), None);
    }

    #[test]
    fn test_invalid_raster_is_rejected() {
        let settings = TerrainSettings::Raster {
            origin: [0.0, 0.0],
            spacing: 100.0,
            columns: 3,
            rows: 2,
            heights: vec![0.0; 4],
            holes: Vec::new(),
        };
        assert!(settings.build_surface().is_err());
    }

    #[test]
    fn test_hills_stay_within_amplitude() {
        let settings = TerrainSettings::Hills {
            origin: [0.0, 0.0],
            spacing: 500.0,
            columns: 5,
            rows: 5,
            amplitude: 80.0,
            wavelength: 700.0,
            holes: Vec::new(),
        };
        let surface = settings.build_surface().unwrap();
        for x in [0.0, 500.0, 1250.0, 2000.0] {
            let height = surface.probe(x, 750.0, window()).unwrap();
            assert!(height.abs() <= 80.0 + 1e-3);
        }
    }
}
