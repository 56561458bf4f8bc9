//! Turns the parent links of a finished search into an ordered route.

use crate::error::PathError;
use crate::map::{GridCoordinate, TerrainGrid};
use nalgebra::Point3;
use std::collections::HashMap;

/// Ordered route produced from a parent map.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// Exact source, the sampled points of the cells before the goal, then the exact destination.
    pub waypoints: Vec<Point3<f32>>,
    /// Cells from the start cell to the goal cell.
    pub cells: Vec<GridCoordinate>,
}

/// Follows `parents` from `goal` back to the start cell.
///
/// The start cell is recognised as the cell that is its own parent. The goal cell's
/// sampled point is replaced by `destination`, and `source` is put in front of the
/// start cell's sampled point.
///
/// # Returns
/// * `Result<Reconstruction, PathError>` - The route, or `BrokenParentChain` if a link is
///   missing, loops, or points at a cell that is not cached
pub fn reconstruct_path(
    grid: &TerrainGrid,
    parents: &HashMap<GridCoordinate, GridCoordinate>,
    goal: GridCoordinate,
    source: &Point3<f32>,
    destination: &Point3<f32>,
) -> Result<Reconstruction, PathError> {
    let mut cells = vec![goal];
    let mut current = goal;
    loop {
        let &parent = parents
            .get(&current)
            .ok_or(PathError::BrokenParentChain { at: current })?;
        if parent == current {
            break;
        }
        // A chain longer than the map itself must revisit a cell
        if cells.len() > parents.len() {
            return Err(PathError::BrokenParentChain { at: parent });
        }
        cells.push(parent);
        current = parent;
    }
    cells.reverse();

    let mut waypoints = Vec::with_capacity(cells.len() + 1);
    waypoints.push(*source);
    for coordinate in &cells[..cells.len() - 1] {
        let point = grid
            .point_of(coordinate)
            .ok_or(PathError::BrokenParentChain { at: *coordinate })?;
        waypoints.push(point);
    }
    waypoints.push(*destination);

    Ok(Reconstruction { waypoints, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use contour_terrain::RasterSurface;
    use nalgebra::Point2;

    fn ramp_grid() -> TerrainGrid {
        let raster =
            RasterSurface::from_fn(Point2::new(0.0, 0.0), 1000.0, 4, 1, |x, _| x * 0.1).unwrap();
        let config = GridConfig {
            parallel: false,
            ..GridConfig::default()
        };
        TerrainGrid::from_probe(&raster, &config).unwrap().0
    }

    fn chain(links: &[((i32, i32), (i32, i32))]) -> HashMap<GridCoordinate, GridCoordinate> {
        links
            .iter()
            .map(|&(child, parent)| (GridCoordinate::from(child), GridCoordinate::from(parent)))
            .collect()
    }

    #[test]
    fn test_reconstruct_replaces_endpoints() {
        let grid = ramp_grid();
        let parents = chain(&[
            ((0, 0), (0, 0)),
            ((1000, 0), (0, 0)),
            ((2000, 0), (1000, 0)),
            ((3000, 0), (2000, 0)),
        ]);
        let source = Point3::new(10.0, 20.0, 1.0);
        let destination = Point3::new(3500.0, 0.0, 350.0);

        let route =
            reconstruct_path(&grid, &parents, GridCoordinate::new(3000, 0), &source, &destination)
                .unwrap();
        assert_eq!(
            route.cells,
            vec![
                GridCoordinate::new(0, 0),
                GridCoordinate::new(1000, 0),
                GridCoordinate::new(2000, 0),
                GridCoordinate::new(3000, 0),
            ]
        );
        assert_eq!(route.waypoints.len(), 5);
        assert_eq!(route.waypoints[0], source);
        assert_eq!(route.waypoints[1], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(route.waypoints[3], Point3::new(2000.0, 0.0, 200.0));
        assert_eq!(route.waypoints[4], destination);
    }

    #[test]
    fn test_missing_link_is_reported() {
        let grid = ramp_grid();
        let parents = chain(&[((0, 0), (0, 0)), ((2000, 0), (1000, 0))]);
        let result = reconstruct_path(
            &grid,
            &parents,
            GridCoordinate::new(2000, 0),
            &Point3::origin(),
            &Point3::origin(),
        );
        assert_eq!(
            result,
            Err(PathError::BrokenParentChain {
                at: GridCoordinate::new(1000, 0)
            })
        );
    }

    #[test]
    fn test_cycle_is_reported() {
        let grid = ramp_grid();
        let parents = chain(&[((1000, 0), (2000, 0)), ((2000, 0), (1000, 0))]);
        let result = reconstruct_path(
            &grid,
            &parents,
            GridCoordinate::new(2000, 0),
            &Point3::origin(),
            &Point3::origin(),
        );
        assert!(matches!(result, Err(PathError::BrokenParentChain { .. })));
    }
}
