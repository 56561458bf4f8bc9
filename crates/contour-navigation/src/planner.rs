//! Thread-safe query facade over a shared terrain grid.

use crate::astar::{PathResult, Pathfinder};
use crate::config::{PlannerConfig, SearchConfig};
use crate::error::{NavigationError, PathError};
use crate::map::{GridCoordinate, TerrainGrid};
use contour_terrain::HeightProbe;
use nalgebra::Point3;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Answers path queries against one terrain grid.
///
/// The grid is read-only and shared; each query builds its own search state, so a
/// planner behind an `Arc` can serve several threads at once.
#[derive(Debug)]
pub struct Planner {
    grid: Arc<TerrainGrid>,
    config: SearchConfig,
    last_path: RwLock<Option<PathResult>>,
}

impl Planner {
    /// Creates a planner over an existing grid.
    pub fn new(grid: Arc<TerrainGrid>, config: SearchConfig) -> Result<Self, NavigationError> {
        config.validate()?;
        Ok(Self {
            grid,
            config,
            last_path: RwLock::new(None),
        })
    }

    /// Samples `probe` into a fresh grid and wraps it.
    ///
    /// A probe without a surface is logged and yields an empty grid; every query on
    /// it then fails with [`PathError::NoPathFound`].
    pub fn from_probe<P>(probe: &P, config: &PlannerConfig) -> Result<Self, NavigationError>
    where
        P: HeightProbe + ?Sized,
    {
        config.validate()?;
        let grid = match TerrainGrid::from_probe(probe, &config.grid) {
            Ok((grid, report)) => {
                info!(
                    "Planner ready: {} cells cached, {} probe misses",
                    report.sampled, report.missed
                );
                grid
            }
            Err(NavigationError::MissingSurface) => {
                error!("Planner created without terrain; all queries will fail");
                TerrainGrid::empty(config.grid.resolution)?
            }
            Err(e) => return Err(e),
        };
        Self::new(Arc::new(grid), config.search.clone())
    }

    /// Finds a path from `source` to `destination`.
    ///
    /// The last successful result is kept for [`last_path`](Self::last_path); a failed
    /// query clears it.
    pub fn compute_path(
        &self,
        source: &Point3<f32>,
        destination: &Point3<f32>,
    ) -> Result<PathResult, PathError> {
        let mut pathfinder = Pathfinder::from_validated(&self.grid, &self.config);
        let result = pathfinder.compute_path(source, destination);

        let mut last_path = self.last_path.write();
        match &result {
            Ok(path) => {
                debug!("Query {:?} -> {:?}: {}", source, destination, path);
                *last_path = Some(path.clone());
            }
            Err(e) => {
                debug!("Query {:?} -> {:?} failed: {}", source, destination, e);
                *last_path = None;
            }
        }
        result
    }

    /// Quantizes a position with the grid's resolution.
    pub fn quantize(&self, position: &Point3<f32>) -> GridCoordinate {
        self.grid.quantize(position)
    }

    /// The most recent successful path, if the last query succeeded.
    pub fn last_path(&self) -> Option<PathResult> {
        self.last_path.read().clone()
    }

    /// The shared grid.
    pub fn grid(&self) -> &Arc<TerrainGrid> {
        &self.grid
    }

    /// The search settings.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use contour_terrain::{FlatSurface, SampleRange, SurfaceBounds};
    use nalgebra::{Point2, Vector2};
    use std::thread;

    fn flat_planner() -> Planner {
        let surface = FlatSurface::new(
            SurfaceBounds::new(Point2::new(0.0, 0.0), Vector2::new(5000.0, 5000.0)),
            0.0,
        );
        Planner::from_probe(&surface, &PlannerConfig::default()).unwrap()
    }

    struct Detached;

    impl HeightProbe for Detached {
        fn probe(&self, _x: f32, _y: f32, _range: SampleRange) -> Option<f32> {
            None
        }

        fn bounds(&self) -> Option<SurfaceBounds> {
            None
        }
    }

    #[test]
    fn test_last_path_tracks_latest_query() {
        let planner = flat_planner();
        assert!(planner.last_path().is_none());

        let path = planner
            .compute_path(&Point3::new(0.0, 0.0, 0.0), &Point3::new(3000.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(planner.last_path(), Some(path));

        let failed =
            planner.compute_path(&Point3::new(0.0, 0.0, 0.0), &Point3::new(-5000.0, 0.0, 0.0));
        assert!(failed.is_err());
        assert!(planner.last_path().is_none());
    }

    #[test]
    fn test_missing_surface_gives_empty_planner() {
        let planner = Planner::from_probe(&Detached, &PlannerConfig::default()).unwrap();
        assert!(planner.grid().is_empty());
        assert_eq!(
            planner.compute_path(&Point3::new(0.0, 0.0, 0.0), &Point3::new(1000.0, 0.0, 0.0)),
            Err(PathError::NoPathFound { nodes_explored: 0 })
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlannerConfig {
            grid: GridConfig {
                resolution: 0,
                ..GridConfig::default()
            },
            ..PlannerConfig::default()
        };
        assert!(matches!(
            Planner::from_probe(&Detached, &config),
            Err(NavigationError::InvalidResolution(0))
        ));
    }

    #[test]
    fn test_quantize_uses_grid_resolution() {
        let planner = flat_planner();
        assert_eq!(
            planner.quantize(&Point3::new(2999.0, -1.0, 0.0)),
            GridCoordinate::new(2000, -1000)
        );
    }

    #[test]
    fn test_concurrent_queries_share_grid() {
        let planner = Arc::new(flat_planner());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let planner = Arc::clone(&planner);
                thread::spawn(move || {
                    let destination = Point3::new(5000.0, i as f32 * 1000.0, 0.0);
                    planner.compute_path(&Point3::new(0.0, 0.0, 0.0), &destination)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap().unwrap();
            assert_eq!(
                result.cells.last(),
                Some(&GridCoordinate::new(5000, i as i32 * 1000))
            );
        }
    }
}
