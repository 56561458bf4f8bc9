//! Terrain-aware grid pathfinding.
//!
//! A [`TerrainGrid`] samples a height surface once at a fixed resolution. Queries
//! then run A* over the cached cells, rejecting edges steeper than a configured
//! angle, and return the route as 3D waypoints from the exact source to the exact
//! destination.
//!
//! ```no_run
//! use contour_navigation::{Planner, PlannerConfig};
//! use contour_terrain::{FlatSurface, SurfaceBounds};
//! use nalgebra::{Point2, Point3, Vector2};
//!
//! let surface = FlatSurface::new(
//!     SurfaceBounds::new(Point2::new(0.0, 0.0), Vector2::new(5000.0, 5000.0)),
//!     0.0,
//! );
//! let planner = Planner::from_probe(&surface, &PlannerConfig::default())?;
//! let source = Point3::new(0.0, 0.0, 0.0);
//! let destination = Point3::new(5000.0, 5000.0, 0.0);
//! let path = planner.compute_path(&source, &destination)?;
//! println!("{}", path);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod astar;
pub mod config;
pub mod cost;
pub mod error;
pub mod map;
pub mod mask;
pub mod path;
pub mod planner;

pub use astar::{PathResult, Pathfinder, SearchNode};
pub use config::{GridConfig, PlannerConfig, SearchConfig};
pub use cost::{CostModel, EdgeCost, slope_angle_degrees};
pub use error::{NavigationError, PathError};
pub use map::{BuildReport, GridCoordinate, SampledCell, TerrainGrid, quantize};
pub use mask::NeighborMask;
pub use planner::Planner;
