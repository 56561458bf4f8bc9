use contour_navigation::{GridConfig, GridCoordinate, Planner, PlannerConfig, TerrainGrid};
use contour_terrain::RasterSurface;
use nalgebra::{Point2, Point3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    println!("Terrain Pathfinding Example");
    println!("===========================");

    // 12x12 nodes, 1000 units apart, with random bumps and a steep ridge
    let mut rng = StdRng::seed_from_u64(42);
    let mut raster = RasterSurface::from_fn(Point2::new(0.0, 0.0), 1000.0, 12, 12, |_, _| 0.0)?;
    for column in 0..12 {
        for row in 0..12 {
            raster.set_height(column, row, rng.random_range(0.0..150.0))?;
        }
    }
    for row in 0..9 {
        raster.set_height(6, row, 2500.0)?;
    }
    // A crater nobody can sample
    raster.set_height(3, 8, f32::NAN)?;
    raster.set_height(3, 9, f32::NAN)?;

    let config = PlannerConfig {
        grid: GridConfig {
            resolution: 1000,
            ..GridConfig::default()
        },
        ..PlannerConfig::default()
    };
    let planner = Planner::from_probe(&raster, &config)?;
    println!("\n{}", planner.grid());

    let source = Point3::new(250.0, 400.0, 0.0);
    let destination = Point3::new(11000.0, 1500.0, 0.0);
    println!("\nSource: {:?}", source);
    println!("Destination: {:?}", destination);

    println!("\nPlanning...");
    match planner.compute_path(&source, &destination) {
        Ok(result) => {
            println!("{}", result);
            println!("\nWaypoints:");
            for (i, point) in result.waypoints.iter().enumerate() {
                println!("  {:2}: ({:8.1}, {:8.1}, {:7.1})", i, point.x, point.y, point.z);
            }
            println!("\nRoute:");
            print_route(planner.grid(), &result.cells);
        }
        Err(e) => println!("No route: {}", e),
    }

    println!("\n{}", "=".repeat(50));
    println!("Testing an unreachable destination...");
    let blocked = planner.compute_path(&source, &Point3::new(3000.0, 8000.0, 0.0));
    match blocked {
        Ok(result) => println!("Unexpected route: {}", result),
        Err(e) => println!("Blocked scenario result: {}", e),
    }

    Ok(())
}

fn print_route(grid: &TerrainGrid, cells: &[GridCoordinate]) {
    let route: HashSet<GridCoordinate> = cells.iter().copied().collect();
    let resolution = grid.resolution();
    let columns = (grid.extent().x as i32) / resolution;
    let rows = (grid.extent().y as i32) / resolution;

    println!("Legend: . = Low, ^ = Steep, ? = No sample, * = Route, S = Start, G = Goal");
    for row in (0..=rows).rev() {
        print!("{:2} ", row);
        for column in 0..=columns {
            let coordinate = GridCoordinate::new(column * resolution, row * resolution);
            let symbol = if cells.first() == Some(&coordinate) {
                'S'
            } else if cells.last() == Some(&coordinate) {
                'G'
            } else if route.contains(&coordinate) {
                '*'
            } else {
                match grid.lookup(&coordinate) {
                    Some(cell) if cell.height > 1000.0 => '^',
                    Some(_) => '.',
                    None => '?',
                }
            };
            print!("{} ", symbol);
        }
        println!();
    }
    print!("   ");
    for column in 0..=columns {
        print!("{} ", column % 10);
    }
    println!();
}
